//! Refresh Decision Trace
//!
//! Drives a headless 200×200 panel through a short simulated session and
//! prints every refresh verdict. Run with:
//!
//! ```text
//! RUST_LOG=eink_dynamic=debug cargo run -p eink-dynamic --example refresh_trace --features std,tracing
//! ```

use eink_dynamic::{DynamicConfig, DynamicDisplay, FrameFlags, DEFAULT_GHOSTING_LIMIT_PX};
use eink_testing::{TestClock, TestPanel};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use tracing_subscriber::EnvFilter;

/// 200×200 panel → 5000 bytes.
const BUFFER: usize = 5000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let clock = TestClock::new(0);
    let config = DynamicConfig::default()
        .with_ghosting_limit(Some(DEFAULT_GHOSTING_LIMIT_PX))
        .with_async_full(true);
    let mut display =
        DynamicDisplay::<_, _, BUFFER>::new(TestPanel::<BUFFER>::new(200, 200), &clock, config)?;

    println!("E-Ink Dynamic Refresh Trace\n");

    // ========================================================================
    // Boot splash: cosmetic, full refresh left running in the background
    // ========================================================================
    Rectangle::new(Point::new(20, 20), Size::new(160, 160))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut **display.panel_mut())?;
    display.request_frame(FrameFlags::COSMETIC);
    display.display()?;
    report("boot splash", &display);

    // Input arrives while the panel is still busy with the splash.
    display.panel_mut().push_busy(&[true]);
    clock.advance(300);
    display.force_display()?;
    report("button press (panel busy)", &display);

    // Next tick: the blocked responsive request is retried.
    display.panel_mut().clear(BinaryColor::Off)?;
    clock.advance(700);
    display.display()?;
    report("next tick", &display);

    // ========================================================================
    // A run of menu scrolls
    // ========================================================================
    for y in (0..180).step_by(30) {
        display.panel_mut().clear(BinaryColor::Off)?;
        Rectangle::new(Point::new(0, y), Size::new(200, 30))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut **display.panel_mut())?;
        clock.advance(1_000);
        display.force_display()?;
        report("scroll", &display);
    }

    // ========================================================================
    // Idle: background redraws
    // ========================================================================
    clock.advance(5_000);
    display.display()?;
    report("idle (too soon)", &display);

    clock.advance(30_000);
    display.display()?;
    report("idle", &display);

    Ok(())
}

fn report(label: &str, display: &DynamicDisplay<TestPanel<BUFFER>, &TestClock, BUFFER>) {
    let decision = display.decision();
    println!(
        "{label:<28} {:<8} {:<34} fast_count={} ghosts={:?} async={}",
        decision.mode().name(),
        decision.reason_str(),
        display.history().fast_refresh_count(),
        display.history().ghost_pixel_count(),
        display.is_async_refresh_running(),
    );
}
