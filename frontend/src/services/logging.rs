/// Console logger with a component tag, so app logs are filterable in the
/// browser console. Raw API error detail stays here; the UI only ever
/// shows fixed low-detail messages.
pub struct Logger;

impl Logger {
    pub fn info(component: &str, message: &str) {
        gloo::console::log!(format!("[{}] {}", component, message));
    }

    pub fn warn(component: &str, message: &str) {
        gloo::console::warn!(format!("[{}] {}", component, message));
    }

    pub fn error(component: &str, message: &str) {
        gloo::console::error!(format!("[{}] {}", component, message));
    }
}
