// ABOUTME: Comma-delimited row framing: splitting a line into fields and joining fields back.
// ABOUTME: Fields containing the delimiter or a quote are double-quoted with embedded quotes doubled.

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Split one line into its fields. A double-quoted field may contain the
/// delimiter; an embedded quote is written doubled.
pub fn split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    current.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == QUOTE {
            in_quotes = true;
        } else if c == DELIMITER {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}

/// Join fields into one line, quoting any field that needs it.
pub fn join(fields: &[String]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| quote_field(f)).collect();
    quoted.join(",")
}

fn quote_field(field: &str) -> String {
    if field.contains(DELIMITER) || field.contains(QUOTE) {
        format!("\"{}\"", field.replace(QUOTE, "\"\""))
    } else {
        field.to_string()
    }
}
