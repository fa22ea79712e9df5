/// Everything the UI loop reacts to. Sent by the input thread and the
/// Ctrl-C handler; only the UI loop touches the page engine.
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    TouchDown { x: i32, y: i32 }, // Finger down (or moved) at display coordinates
    TouchUp,                      // Finger lifted
    Tap { x: i32, y: i32 },       // Down and up on consecutive ticks
    Joystick { x: i16, y: i16 },  // Joystick deflection, -100..=100 per axis
    NextPage,                     // Hardware button: next page
    PreviousPage,                 // Hardware button: previous page
    ShowPage(u16),                // Jump straight to a page id
    Pair,                         // Start pairing with the vehicle
    Charging(bool),               // Charger connected or disconnected
    Status(String),               // Footer status text
    Dump,                         // Log the widget registry and write a frame dump
    Shutdown,                     // Signal to exit the application
}
