use console::{Emoji, style};

pub fn print_header(title: &str) {
    println!();
    println!("{} {}", Emoji("⚡", "*"), style(title).bold().underlined());
    println!();
}

pub fn print_success(message: &str) {
    println!("  {} {}", style(Emoji("✔", "+")).green(), message);
}

pub fn print_info(message: &str) {
    println!("  {} {}", style(Emoji("ℹ", "i")).blue(), message);
}

pub fn print_next_step(message: &str) {
    println!("  {} {}", style(Emoji("➜", ">")).cyan(), message);
}

pub fn log_detail(key: &str, value: &str) {
    println!("    {}: {}", style(key).dim(), value);
}
