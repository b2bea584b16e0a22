// Business logic services layer
//
// Migration engine used by the command handlers and the interactive menu.

pub mod migration;
