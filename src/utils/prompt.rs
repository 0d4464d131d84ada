use std::io::{self, BufRead, Write};

/// Ask until the answer is y, n, or empty with a default. End of input counts as "no".
pub fn prompt_confirm_from<R: BufRead, W: Write>(
    prompt: &str,
    default: Option<bool>,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    let mut line = String::new();

    loop {
        line.clear();

        match default {
            Some(true) => write!(output, "{} (Y/n): ", prompt)?,
            Some(false) | None => write!(output, "{} (y/N): ", prompt)?,
        }
        output.flush()?;

        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match line.trim().to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
