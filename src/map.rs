/// Track quality map visualization

use crate::buffer::DiskBuffer;

/// ANSI color codes for quality map
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BRIGHT_WHITE: &str = "\x1b[97m";
    pub const DARK_WHITE: &str = "\x1b[37m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
}

/// Quality at or above which a track is shown as excellent
const EXCELLENT_QUALITY: f64 = 90.0;

/// How a buffered track is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityBand {
    /// At or above 90
    Excellent,
    /// At or above the retry threshold
    Acceptable,
    /// Below the retry threshold
    Poor,
}

impl QualityBand {
    /// Classify a quality score against a retry threshold
    pub fn classify(quality: f64, threshold: f64) -> Self {
        if quality >= EXCELLENT_QUALITY {
            QualityBand::Excellent
        } else if quality >= threshold {
            QualityBand::Acceptable
        } else {
            QualityBand::Poor
        }
    }

    fn color(&self) -> &'static str {
        match self {
            QualityBand::Excellent => colors::BRIGHT_WHITE,
            QualityBand::Acceptable => colors::DARK_WHITE,
            QualityBand::Poor => colors::BRIGHT_RED,
        }
    }
}

/// Draw a visual quality map: one row per side, one column per track
pub fn draw_quality_map(buffer: &DiskBuffer, threshold: f64) {
    let num_tracks = buffer.disk_info().total_tracks;
    if num_tracks == 0 {
        println!("No tracks buffered.");
        return;
    }

    const BLOCK: &str = "\u{2593}"; // ▓
    const BLOCK_PROTECTED: &str = "\u{2592}"; // ▒

    println!("=== Quality Map ===");
    println!(
        "Legend: {}>= {:.0}{} {}>= {:.0}{} {}< {:.0}{} {}{}{} protected",
        colors::BRIGHT_WHITE, EXCELLENT_QUALITY, colors::RESET,
        colors::DARK_WHITE, threshold, colors::RESET,
        colors::BRIGHT_RED, threshold, colors::RESET,
        colors::BRIGHT_YELLOW, BLOCK_PROTECTED, colors::RESET
    );
    println!();

    for side in 0..buffer.disk_info().sides {
        print!("S{} ", side);
        for track_num in 0..num_tracks {
            match buffer.get(track_num as u8, side) {
                Some(result) => {
                    let band = QualityBand::classify(result.quality_score, threshold);
                    let block = if result.protection.is_protected() {
                        BLOCK_PROTECTED
                    } else {
                        BLOCK
                    };
                    print!("{}{}{}", band.color(), block, colors::RESET);
                }
                // Not buffered
                None => print!(" "),
            }
        }
        println!();
    }

    // Track number axis, a label every 5 tracks
    print!("   ");
    let mut printed_cols = vec![false; num_tracks];
    for track_num in 0..num_tracks {
        if track_num % 5 == 0 && !printed_cols[track_num] {
            for (i, digit) in track_num.to_string().chars().enumerate() {
                let col = track_num + i;
                if col < num_tracks {
                    print!("{}", digit);
                    printed_cols[col] = true;
                }
            }
        } else if !printed_cols[track_num] {
            print!(" ");
        }
    }
    println!();
}
