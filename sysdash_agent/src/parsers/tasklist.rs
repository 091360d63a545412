//! `tasklist /FO CSV /NH` rows:
//! `"Image Name","PID","Session Name","Session#","Mem Usage"`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub pid: String,
    pub name: String,
    pub mem_bytes: u64,
}

pub fn parse_tasklist(raw: &str) -> Vec<TaskRow> {
    raw.trim().lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<TaskRow> {
    let fields = split_csv(line.trim());
    if fields.len() < 5 {
        return None;
    }
    let pid = fields[1].trim();
    // Localized "INFO: No tasks are running" style lines have no numeric pid.
    if pid.is_empty() || !pid.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(TaskRow {
        pid: pid.to_string(),
        name: fields[0].trim().to_string(),
        mem_bytes: parse_mem_usage(&fields[4]),
    })
}

/// "12,345 K" → bytes. Thousands separators vary by locale, so keep digits only.
fn parse_mem_usage(field: &str) -> u64 {
    let digits: String = field.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<u64>()
        .map(|kib| kib.saturating_mul(1024))
        .unwrap_or(0)
}

fn split_csv(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                cur.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut cur)),
            _ => cur.push(c),
        }
    }
    fields.push(cur);
    fields
}
