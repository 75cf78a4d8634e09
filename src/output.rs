pub struct Styler {
    color_enabled: bool,
}

impl Styler {
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    fn wrap(&self, code: &str, s: &str) -> String {
        if !self.color_enabled {
            return s.to_string();
        }
        format!("{}{}\u{001b}[0m", code, s)
    }

    pub fn green(&self, s: &str) -> String {
        self.wrap("\u{001b}[32m", s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.wrap("\u{001b}[33m", s)
    }

    pub fn gray(&self, s: &str) -> String {
        self.wrap("\u{001b}[90m", s)
    }
}

/// Display width of a string. Entry titles and bodies are free text and
/// often CJK or emoji, which render as 2 columns; table alignment has to
/// account for that without probing the terminal.
pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| if is_wide_char(c) { 2 } else { 1 }).sum()
}

fn is_wide_char(c: char) -> bool {
    let cp = c as u32;
    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&cp) ||
    (0x3400..=0x4DBF).contains(&cp) ||
    (0x20000..=0x2A6DF).contains(&cp) ||
    // CJK Compatibility Ideographs
    (0xF900..=0xFAFF).contains(&cp) ||
    // Hiragana / Katakana
    (0x3040..=0x30FF).contains(&cp) ||
    // Fullwidth forms
    (0xFF00..=0xFFEF).contains(&cp) ||
    // Hangul Syllables
    (0xAC00..=0xD7AF).contains(&cp) ||
    // Common emoji ranges
    (0x1F300..=0x1F9FF).contains(&cp) ||
    (0x2600..=0x26FF).contains(&cp) ||
    (0x2700..=0x27BF).contains(&cp)
}

fn pad_right(s: &str, width: usize) -> String {
    let dw = display_width(s);
    if dw >= width {
        s.to_string()
    } else {
        let mut out = String::with_capacity(s.len() + (width - dw));
        out.push_str(s);
        out.push_str(&" ".repeat(width - dw));
        out
    }
}

pub fn render_simple_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();

    for row in rows.iter() {
        for (i, cell) in row.iter().enumerate() {
            let cell_width = display_width(cell);
            if i >= widths.len() {
                widths.push(cell_width);
            } else {
                widths[i] = widths[i].max(cell_width);
            }
        }
    }

    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad_right(h, widths[i]))
        .collect::<Vec<String>>()
        .join("  ");

    let mut body_lines: Vec<String> = Vec::new();
    for row in rows.iter() {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad_right(cell, widths[i]))
            .collect::<Vec<String>>()
            .join("  ");
        body_lines.push(line);
    }

    if body_lines.is_empty() {
        header_line
    } else {
        format!("{}\n{}", header_line, body_lines.join("\n"))
    }
}
