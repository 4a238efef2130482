//! Router event log.

use owo_colors::OwoColorize;

use fritzly_core::{Router, RouterRpc};

use crate::cli::{GlobalOpts, LogArgs};
use crate::error::CliError;
use crate::output;

/// `dd.mm.yy hh:mm:ss` prefix of every log line.
const TIMESTAMP_WIDTH: usize = 17;

pub async fn handle<R: RouterRpc>(
    router: &Router<R>,
    args: LogArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut lines = router.device_log().await?;
    lines.truncate(args.lastlines);

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &lines,
        |lines| {
            lines
                .iter()
                .map(|line| highlight(line, color))
                .collect::<Vec<_>>()
                .join("\n")
        },
        |lines| lines.join("\n"),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn highlight(line: &str, color: bool) -> String {
    if !color {
        return line.to_owned();
    }
    match line.char_indices().nth(TIMESTAMP_WIDTH) {
        Some((split, _)) => {
            let (stamp, rest) = line.split_at(split);
            format!("{}{rest}", stamp.green())
        }
        None => line.green().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "18.10.26 09:14:02 Internet connection established.";

    #[test]
    fn plain_without_color() {
        assert_eq!(highlight(LINE, false), LINE);
    }

    #[test]
    fn timestamp_is_green() {
        let out = highlight(LINE, true);
        assert!(out.starts_with("\u{1b}[32m18.10.26 09:14:02\u{1b}[39m"), "got {out:?}");
        assert!(out.ends_with(" Internet connection established."));
    }
}
