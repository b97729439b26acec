//! The board search widget.
//!
//! The widget is static markup: a form with one count filter per peripheral
//! class and a container for the active filter chips. Filtering itself runs
//! client-side against the published database.

use std::fmt::Write;
use std::str::FromStr;


/// Directive that places the widget on a page.
pub const DIRECTIVE: &str = ".. boardselector:boardsearch::";

/// Shown instead of the widget in non-HTML output.
pub const LATEX_FALLBACK: &str = "Board search is only available on HTML output";

/// Peripheral classes a board can be filtered by.
pub const PERIPHERALS: &[&str] = &[
    "ADC",
    "CAN",
    "Counter",
    "DAC",
    "Display",
    "DMA",
    "EEPROM",
    "Entropy",
    "Ethernet",
    "Flash",
    "GPIO",
    "I2C",
    "I2S",
    "I3C",
    "LED",
    "PWM",
    "RTC",
    "SDHC",
    "Sensor",
    "Serial",
    "SPI",
    "USB",
    "Watchdog",
    "Wi-Fi",
    "Bluetooth",
];

/// Output format of the documentation build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Latex,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "latex" => Ok(Self::Latex),
            other => Err(format!("unknown output format '{other}' (expected html or latex)")),
        }
    }
}

/// `Wi-Fi` → `wi-fi`, `I2C` → `i2c`.
fn slug(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// The widget's HTML fragment.
pub fn render_html() -> String {
    let mut html = String::from("<div class=\"boardselector\">\n<form class=\"boardselector-filters\">\n");
    for label in PERIPHERALS {
        let id = slug(label);
        let _ = writeln!(
            html,
            "  <div class=\"boardselector-filter\">\
             <label for=\"boardselector-{id}\">{label}</label>\
             <input type=\"number\" id=\"boardselector-{id}\" name=\"{id}\" min=\"0\" value=\"0\">\
             </div>"
        );
    }
    html.push_str("</form>\n<div class=\"boardselector-chips\"></div>\n</div>\n");
    html
}

/// The widget as it appears in `format` output.
pub fn render(format: OutputFormat) -> String {
    match format {
        OutputFormat::Html => render_html(),
        OutputFormat::Latex => LATEX_FALLBACK.to_string(),
    }
}

fn is_directive(line: &str) -> bool {
    line.trim() == DIRECTIVE
}

/// Whether a page places the widget, and so needs the widget assets.
pub fn page_requests_widget(source: &str) -> bool {
    source.lines().any(is_directive)
}

/// Replace every directive line of `source` by the rendered widget.
pub fn expand_page(source: &str, format: OutputFormat) -> String {
    let widget = render(format);
    let mut out = String::with_capacity(source.len() + widget.len());
    for line in source.lines() {
        if is_directive(line) {
            out.push_str(&widget);
            if !widget.ends_with('\n') {
                out.push('\n');
            }
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
