//! Usage: Application layer (logging, tray/window lifecycle, main window wiring).

pub(crate) mod logging;
pub(crate) mod resident;
pub(crate) mod window;
