//! Terminal setup, teardown and panic recovery

use std::{
    io::{self, Stdout, Write},
    sync::atomic::{AtomicBool, Ordering},
};

use crossterm::{
    cursor,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Set while raw mode and the alternate screen are in use
static TUI_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Configures the terminal for drawing the timer
pub fn startup() -> io::Result<Stdout> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        cursor::Hide
    )?;
    TUI_ACTIVE.store(true, Ordering::SeqCst);
    Ok(stdout)
}

/// Restores the terminal to its normal state
pub fn cleanup(stdout: &mut Stdout) -> io::Result<()> {
    execute!(
        stdout,
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen,
        cursor::Show
    )?;
    terminal::disable_raw_mode()?;
    TUI_ACTIVE.store(false, Ordering::SeqCst);
    Ok(())
}

/// Restore the terminal before the default panic message is printed
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal_on_panic();
        default_hook(info);
    }));
}

/// Best-effort restore using raw escape sequences. Returns `false` if the
/// terminal was never set up.
pub fn restore_terminal_on_panic() -> bool {
    if !TUI_ACTIVE.swap(false, Ordering::SeqCst) {
        return false;
    }

    let mut stdout = io::stdout();
    // focus reporting, mouse tracking, alternate screen, cursor, attributes
    let _ = stdout.write_all(b"\x1b[?1004l\x1b[?1000l\x1b[?1002l\x1b[?1003l\x1b[?1006l");
    let _ = stdout.write_all(b"\x1b[?1049l\x1b[?25h\x1b[0m");
    let _ = stdout.flush();
    let _ = terminal::disable_raw_mode();
    true
}
