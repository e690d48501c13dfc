use termimad::MadSkin;
use termimad::crossterm::style::Color;

const REPORT_TITLE: &str = "Kubernetes Status Report";

/// Terminal rendering context, passed explicitly into the dispatcher.
pub struct Console {
    skin: MadSkin,
}

impl Console {
    pub fn new() -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Yellow);
        skin.bold.set_fg(Color::White);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_fg(Color::Cyan);

        Self { skin }
    }

    /// The report body as styled terminal text.
    pub fn render(&self, report: &str) -> String {
        self.skin.term_text(report).to_string()
    }

    /// Prints the report inside a titled frame.
    pub fn print_report(&self, report: &str) {
        let width = usize::from(termimad::terminal_size().0.max(40));
        println!("{}", frame_title(REPORT_TITLE, width));
        print!("{}", self.render(report));
        println!("{}", "─".repeat(width));
    }

    pub fn warn(&self, message: &str) {
        eprintln!("warning: {message}");
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

fn frame_title(title: &str, width: usize) -> String {
    let label = format!("── {title} ");
    let remainder = width.saturating_sub(label.chars().count());
    format!("{label}{}", "─".repeat(remainder))
}
