/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const BLUE: &str = "\x1b[34m";

/// NULL cells are greyed out, everything else is printed as is.
pub fn color_for_cell(is_null: bool) -> &'static str {
    if is_null { GREY } else { RESET }
}
