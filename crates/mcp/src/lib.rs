// Favorability plugin surface: chat commands, model tools, prompt injection
// and an MCP server over stdio

pub mod commands;
pub mod plugin;
pub mod protocol;
pub mod server;
pub mod tools;

pub use plugin::FavorPlugin;
pub use server::McpServer;
