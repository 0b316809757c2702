//! Welcome banner printed when a chat starts.

use console::style;

pub fn print_welcome_banner(agent: &str, dialog_id: &str, model: Option<&str>) {
    println!();
    println!("  {} {}", style("*").cyan(), style(agent).cyan().bold());
    println!();
    if let Some(model) = model {
        println!("  {}   {}", style("Model:").bold(), style(model).dim());
    }
    println!("  {}  {}", style("Dialog:").bold(), style(dialog_id).dim());
    println!();
    println!(
        "  {}",
        style("Type 'exit' or /help for commands, Ctrl+D to quit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
