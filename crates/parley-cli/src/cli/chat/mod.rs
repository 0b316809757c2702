//! Interactive chat loop.
//!
//! Reads lines with `rustyline-async`, handles slash commands, and sends
//! everything else to the resolved agent. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
