//! Model id pluralization and casing used to derive generated GraphQL names
//!
//! The Manage API generates list queries from the pluralized model id
//! (`article` → `listArticles`) using the `pluralize` npm package, so the
//! tables below mirror its uncountables, irregulars and ordered suffix rules.
//! Rules look at the whole id, not the last camelCase word.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Whole words (lowercased) that have no distinct plural form
const UNCOUNTABLE: &[&str] = &[
    "adulthood", "advice", "agenda", "aid", "aircraft", "alcohol", "ammo", "analytics",
    "anime", "athletics", "audio", "bison", "blood", "bream", "buffalo", "butter", "carp",
    "cash", "chassis", "chess", "clothing", "cod", "commerce", "cooperation", "corps",
    "debris", "diabetes", "digestion", "elk", "energy", "equipment", "excretion",
    "expertise", "firmware", "flounder", "fun", "gallows", "garbage", "graffiti",
    "hardware", "headquarters", "health", "herpes", "highjinks", "homework", "housework",
    "information", "jeans", "justice", "kudos", "labour", "literature", "machinery",
    "mackerel", "mail", "media", "mews", "moose", "music", "mud", "manga", "news", "only",
    "personnel", "pike", "plankton", "pliers", "police", "pollution", "premises", "rain",
    "research", "rice", "salmon", "scissors", "series", "sewage", "shambles", "shrimp",
    "software", "staff", "swine", "tennis", "traffic", "transportation", "trout", "tuna",
    "wealth", "welfare", "whiting", "wildebeest", "wildlife", "you",
];

/// Suffixes of words that have no distinct plural form
const UNCOUNTABLE_PATTERNS: &[&str] = &[
    r"pok[eé]mon$",
    r"[^aeiou]ese$",
    r"deer$",
    r"fish$",
    r"measles$",
    r"o[iu]s$",
    r"pox$",
    r"sheep$",
];

/// Irregular singular → plural pairs, matched against the whole lowercased id
const IRREGULAR: &[(&str, &str)] = &[
    ("i", "we"),
    ("me", "us"),
    ("he", "they"),
    ("she", "they"),
    ("them", "them"),
    ("myself", "ourselves"),
    ("yourself", "yourselves"),
    ("itself", "themselves"),
    ("herself", "themselves"),
    ("himself", "themselves"),
    ("themself", "themselves"),
    ("is", "are"),
    ("was", "were"),
    ("has", "have"),
    ("this", "these"),
    ("that", "those"),
    ("echo", "echoes"),
    ("dingo", "dingoes"),
    ("volcano", "volcanoes"),
    ("tornado", "tornadoes"),
    ("torpedo", "torpedoes"),
    ("genus", "genera"),
    ("viscus", "viscera"),
    ("stigma", "stigmata"),
    ("stoma", "stomata"),
    ("dogma", "dogmata"),
    ("lemma", "lemmata"),
    ("schema", "schemata"),
    ("anathema", "anathemata"),
    ("ox", "oxen"),
    ("axe", "axes"),
    ("die", "dice"),
    ("yes", "yeses"),
    ("foot", "feet"),
    ("eave", "eaves"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("quiz", "quizzes"),
    ("human", "humans"),
    ("proof", "proofs"),
    ("carve", "carves"),
    ("valve", "valves"),
    ("looey", "looies"),
    ("thief", "thieves"),
    ("groove", "grooves"),
    ("pickaxe", "pickaxes"),
    ("passerby", "passersby"),
];

/// Suffix rules in ascending priority: the last matching rule wins.
/// `$n` in a replacement is the n-th capture group (`$0` the whole match).
const SUFFIX_RULES: &[(&str, &str)] = &[
    (r"s?$", "s"),
    (r"[^\x00-\x7F]$", "$0"),
    (r"([^aeiou]ese)$", "$1"),
    (r"(ax|test)is$", "$1es"),
    (r"(alias|[^aou]us|t[lm]as|gas|ris)$", "$1es"),
    (r"(e[mn]u)s?$", "$1s"),
    (r"([^l]ias|[aeiou]las|[ejzr]as|[iu]am)$", "$1"),
    (
        r"(alumn|syllab|vir|radi|nucle|fung|cact|stimul|termin|bacill|foc|uter|loc|strat)(?:us|i)$",
        "$1i",
    ),
    (r"(alumn|alg|vertebr)(?:a|ae)$", "$1ae"),
    (r"(seraph|cherub)(?:im)?$", "$1im"),
    (r"(her|at|gr)o$", "$1oes"),
    (
        r"(agend|addend|millenni|dat|extrem|bacteri|desiderat|strat|candelabr|errat|ov|symposi|curricul|automat|quor)(?:a|um)$",
        "$1a",
    ),
    (
        r"(apheli|hyperbat|periheli|asyndet|noumen|phenomen|criteri|organ|prolegomen|hedr|automat)(?:a|on)$",
        "$1a",
    ),
    (r"sis$", "ses"),
    (r"(?:(kni|wi|li)fe|(ar|l|ea|eo|oa|hoo)f)$", "$1$2ves"),
    (r"([^aeiouy]|qu)y$", "$1ies"),
    (r"([^ch][ieo][ln])ey$", "$1ies"),
    (r"(x|ch|ss|sh|zz)$", "$1es"),
    (r"(matr|cod|mur|sil|vert|ind|append)(?:ix|ex)$", "$1ices"),
    (r"\b((?:tit)?m|l)(?:ice|ouse)$", "$1ice"),
    (r"(pe)(?:rson|ople)$", "$1ople"),
    (r"(child)(?:ren)?$", "$1ren"),
    (r"eaux$", "$0"),
    (r"m[ae]n$", "men"),
    (r"^thou$", "you"),
];

struct SuffixRule {
    pattern: Regex,
    replacement: &'static str,
}

/// Suffix rules followed by the uncountable patterns, which map a word to itself
static RULES: LazyLock<Vec<SuffixRule>> = LazyLock::new(|| {
    SUFFIX_RULES
        .iter()
        .copied()
        .chain(UNCOUNTABLE_PATTERNS.iter().map(|pattern| (*pattern, "$0")))
        .filter_map(|(pattern, replacement)| {
            Regex::new(&format!("(?i){}", pattern))
                .ok()
                .map(|pattern| SuffixRule {
                    pattern,
                    replacement,
                })
        })
        .collect()
});

/// Upper-case the first character (`blogPost` → `BlogPost`)
pub fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_upper(c: char) -> bool {
    c.to_uppercase().eq(std::iter::once(c))
}

/// Give `token` the casing of `word`: all lower, all upper, or capitalized
fn restore_case(word: &str, token: &str) -> String {
    if word == token {
        return token.to_string();
    }
    if word == word.to_lowercase() {
        return token.to_lowercase();
    }
    if word == word.to_uppercase() {
        return token.to_uppercase();
    }
    if word.chars().next().is_some_and(is_upper) {
        return upper_first(&token.to_lowercase());
    }
    token.to_lowercase()
}

/// Expand `$n` references; missing groups expand to nothing
fn interpolate(replacement: &str, captures: &Captures) -> String {
    let mut out = String::with_capacity(replacement.len() + 8);
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let mut index = String::new();
        while index.len() < 2 {
            match chars.peek() {
                Some(d) if d.is_ascii_digit() => {
                    index.push(*d);
                    chars.next();
                }
                _ => break,
            }
        }

        if index.is_empty() {
            out.push('$');
        } else if let Some(group) = index.parse::<usize>().ok().and_then(|i| captures.get(i)) {
            out.push_str(group.as_str());
        }
    }

    out
}

/// Replace the first match of `rule` in `word`, keeping the matched text's casing
fn apply_rule(word: &str, rule: &SuffixRule, captures: &Captures) -> String {
    let Some(found) = captures.get(0) else {
        return word.to_string();
    };

    let result = interpolate(rule.replacement, captures);
    let head = &word[..found.start()];

    // An empty match (`s?$`) takes its casing from the preceding character
    let restored = if found.as_str().is_empty() {
        match head.chars().next_back() {
            Some(previous) => restore_case(&previous.to_string(), &result),
            None => result,
        }
    } else {
        restore_case(found.as_str(), &result)
    };

    format!("{}{}{}", head, restored, &word[found.end()..])
}

/// Convert a model id to its plural form the way the service does
pub fn pluralize_model_id(model_id: &str) -> String {
    let token = model_id.to_lowercase();

    if IRREGULAR.iter().any(|(_, plural)| *plural == token) {
        return restore_case(model_id, &token);
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == token) {
        return restore_case(model_id, plural);
    }
    if token.is_empty() || UNCOUNTABLE.contains(&token.as_str()) {
        return model_id.to_string();
    }

    RULES
        .iter()
        .rev()
        .find_map(|rule| {
            rule.pattern
                .captures(model_id)
                .map(|captures| apply_rule(model_id, rule, &captures))
        })
        .unwrap_or_else(|| model_id.to_string())
}
