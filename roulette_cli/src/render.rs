use roulette_core::{Clock, FrameScheduler, HistoryStore, Hsl, RandomSource, Roulette};
use std::io::{self, Write};

fn swatch(color: Hsl) -> String {
    let (r, g, b) = color.to_rgb();
    format!("\x1b[48;2;{r};{g};{b}m    \x1b[0m")
}

/// Redraws the single status line: the wedge under the pointer and the
/// current rotation.
pub fn draw_frame<C: Clock, S: FrameScheduler, R: RandomSource>(
    roulette: &Roulette<C, S, R>,
) -> io::Result<()> {
    let index = roulette.index_under_pointer();
    let item = &roulette.items()[index];
    let color = roulette
        .palette()
        .get(index)
        .copied()
        .unwrap_or(Hsl::new(0, 0, 80));
    let mut out = io::stdout().lock();
    write!(
        out,
        "\r\x1b[2K{} ▶ {:<24} rotation {:>10.3}",
        swatch(color),
        item,
        roulette.rotation()
    )?;
    out.flush()
}

pub fn print_palette(items: &[String], palette: &[Hsl]) {
    for (item, color) in items.iter().zip(palette) {
        println!("{} {:<24} {}", swatch(*color), item, color.to_css());
    }
}

/// History list, newest first, with the latest result marked.
pub fn print_history(history: &HistoryStore) {
    println!("History:");
    for (pos, entry) in history.list().iter().enumerate() {
        let marker = if pos == 0 { "*" } else { " " };
        println!("{marker} {:>3}. {}", entry.index + 1, entry.item);
    }
}
