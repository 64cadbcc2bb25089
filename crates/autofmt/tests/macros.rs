use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};

use autofmt::{Flatten, Leaf, fmt_debug, fmt_info, fmt_warn, stm_error, stm_info, stm_trace};
use tracing::level_filters::LevelFilter;

// ---------------------------------------------------------------------------
// Capture helpers
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for Captured {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a subscriber that records bare messages at `max_level`.
fn capture(max_level: LevelFilter, f: impl FnOnce()) -> Vec<String> {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(move || writer.clone())
        .with_target(false)
        .with_level(true)
        .without_time()
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.lines()
}

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

#[derive(Leaf)]
#[autofmt(crate = "autofmt")]
#[autofmt(format = "struct:{}")]
struct Point {
    x: i32,
    y: i32,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Flatten)]
#[autofmt(crate = "autofmt")]
struct Reading {
    celsius: f32,
    samples: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn uniform_macros_render_display_of_each_value() {
    let lines = capture(LevelFilter::TRACE, || {
        stm_info!("disk", 81.5_f32, 3);
        stm_error!(sep = ',', "a", 'b', 7_u8);
        stm_info!();
    });
    assert_eq!(lines.len(), 3, "{lines:?}");
    assert!(lines[0].ends_with("INFO disk 81.5 3"), "{}", lines[0]);
    assert!(lines[1].ends_with("ERROR a,b,7"), "{}", lines[1]);
    assert!(lines[2].trim_end().ends_with("INFO"), "{}", lines[2]);
}

#[test]
fn typed_macros_apply_leaf_rules() {
    let p = Point { x: 3, y: 4 };
    let reading = Reading {
        celsius: 21.456,
        samples: 9,
    };
    let lines = capture(LevelFilter::TRACE, || {
        fmt_info!(1.0_f32, 2, 3.5_f64, 4.25_f32);
        fmt_warn!(sep = '|', p, reading);
        fmt_debug!("temp", reading.celsius);
    });
    assert_eq!(lines.len(), 3, "{lines:?}");
    assert!(lines[0].ends_with("INFO 1.00 2 3.50 4.25"), "{}", lines[0]);
    assert!(lines[1].ends_with("WARN struct:(3, 4)|21.46|9"), "{}", lines[1]);
    assert!(lines[2].ends_with("DEBUG temp 21.46"), "{}", lines[2]);
}

#[test]
fn disabled_level_is_not_rendered() {
    struct Loud;

    impl fmt::Display for Loud {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            panic!("rendered a filtered-out message");
        }
    }

    let lines = capture(LevelFilter::INFO, || {
        stm_trace!(Loud);
        stm_info!("kept");
    });
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].ends_with("INFO kept"));
}

#[test]
fn temporaries_live_through_rendering() {
    let name = String::from("pump");
    let lines = capture(LevelFilter::INFO, || {
        stm_info!(name.to_uppercase(), 2 + 2);
        fmt_info!(format!("{name}-1"), 0.5_f64 * 3.0);
    });
    assert!(lines[0].ends_with("PUMP 4"), "{}", lines[0]);
    assert!(lines[1].ends_with("pump-1 1.50"), "{}", lines[1]);
}

#[test]
fn widest_call_site_renders_every_argument() {
    let lines = capture(LevelFilter::INFO, || {
        stm_info!(sep = ',', 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20);
        fmt_info!(sep = ',', 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 0.5_f32);
    });
    let expected: Vec<String> = (1..=20).map(|n| n.to_string()).collect();
    assert!(lines[0].ends_with(&expected.join(",")), "{}", lines[0]);
    assert!(lines[1].ends_with(&format!("{},0.50", expected[..19].join(","))), "{}", lines[1]);
}
