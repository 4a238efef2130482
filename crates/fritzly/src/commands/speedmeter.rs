//! Live WAN utilization display.

use std::io::{self, Write};

use serde::Serialize;

use fritzly_core::sampler::{SAMPLE_INTERVAL, sample_online_monitor};
use fritzly_core::{OnlineMonitorSample, Router, RouterRpc};

use crate::cli::{GlobalOpts, OutputFormat, SpeedmeterArgs};
use crate::commands::util::ctrl_c_token;
use crate::error::CliError;
use crate::output;
use crate::table::{Align, Table};

/// Sparkline glyphs, lowest to highest.
const BARS: [char; 7] = [' ', '_', '▂', '▃', '▅', '▇', '█'];

#[derive(Debug, Serialize)]
struct LinkRow<'a> {
    link: &'static str,
    current: u64,
    max: u64,
    utilization: f64,
    history: &'a [u64],
}

fn links(sample: &OnlineMonitorSample) -> [LinkRow<'_>; 2] {
    [
        LinkRow {
            link: "UP",
            current: sample.current_upstream(),
            max: sample.max_upstream,
            utilization: sample.upstream_utilization(),
            history: &sample.upstream_history,
        },
        LinkRow {
            link: "DOWN",
            current: sample.current_downstream(),
            max: sample.max_downstream,
            utilization: sample.downstream_utilization(),
            history: &sample.downstream_history,
        },
    ]
}

pub async fn handle<R: RouterRpc>(
    router: &Router<R>,
    args: SpeedmeterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let redraw = global.output == OutputFormat::Table && !args.once;
    let cancel = ctrl_c_token();
    let mut drawn = 0_usize;
    let mut failure = None;

    sample_online_monitor(router, SAMPLE_INTERVAL, args.once, &cancel, |sample| {
        if failure.is_some() {
            return;
        }
        let rows = links(sample);
        let out = match output::render_list(
            global.output,
            &rows,
            |rows| link_table(rows, color),
            |row| format!("{} {}", row.link, row.current),
        ) {
            Ok(out) => out,
            Err(e) => {
                failure = Some(e);
                cancel.cancel();
                return;
            }
        };
        if global.quiet {
            return;
        }

        let mut stdout = io::stdout().lock();
        if redraw {
            let _ = write!(stdout, "{}", redraw_frame(&out, drawn));
            drawn = out.lines().count();
        } else {
            let _ = writeln!(stdout, "{out}");
        }
        let _ = stdout.flush();
    })
    .await?;

    failure.map_or(Ok(()), Err)
}

fn link_table(rows: &[LinkRow<'_>], color: bool) -> String {
    Table::new(["LINK", "CURRENT", "MAX", "UTILIZATION", "HISTORY"])
        .align_all(Align::Right)
        .header_style(color)
        .rows(rows.iter().map(|row| {
            [
                row.link.to_owned(),
                row.current.to_string(),
                row.max.to_string(),
                format!("{:.3}", row.utilization),
                charbar(row.history, row.max),
            ]
        }))
        .render()
}

/// Move up over the `previous` frame and overwrite it line by line.
///
/// Each line clears to its end, so a narrower frame leaves no tail behind.
fn redraw_frame(frame: &str, previous: usize) -> String {
    let mut out = "\x1b[F".repeat(previous);
    for line in frame.lines() {
        out.push_str(line);
        out.push_str("\x1b[K\n");
    }
    out
}

/// One glyph per history value, scaled against `max`.
fn charbar(values: &[u64], max: u64) -> String {
    if max == 0 {
        return "X".repeat(values.len().max(1));
    }
    values
        .iter()
        .map(|&v| {
            #[allow(clippy::cast_precision_loss)]
            let ratio = v as f64 / max as f64;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let pos = ((ratio * BARS.len() as f64) as usize).min(BARS.len() - 1);
            BARS[pos]
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn charbar_scales_against_max() {
        assert_eq!(charbar(&[0, 50, 100, 200], 100), " ▃██");
        assert_eq!(charbar(&[15, 30], 100), "_▂");
    }

    #[test]
    fn charbar_without_max() {
        assert_eq!(charbar(&[1, 2, 3], 0), "XXX");
        assert_eq!(charbar(&[], 0), "X");
    }

    #[test]
    fn table_is_right_aligned_with_three_decimals() {
        let sample = OnlineMonitorSample {
            max_upstream: 1000,
            max_downstream: 10000,
            upstream_history: vec![500, 0],
            downstream_history: vec![2500, 10000],
        };
        let table = link_table(&links(&sample), false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], " LINK  CURRENT    MAX  UTILIZATION  HISTORY ");
        assert_eq!(lines[1], "   UP      500   1000        0.500       ▃  ");
        assert_eq!(lines[2], " DOWN     2500  10000        0.250       _█ ");
    }

    #[test]
    fn redraw_clears_each_line_tail() {
        assert_eq!(
            redraw_frame(" A \n 5 ", 2),
            "\x1b[F\x1b[F A \x1b[K\n 5 \x1b[K\n"
        );
        assert_eq!(redraw_frame("x", 0), "x\x1b[K\n");
    }
}
