use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Spinner on stderr while a capture is loaded or written; drawn only when `visible`
pub fn spinner(template: &str, message: &str, visible: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(if visible {
        ProgressDrawTarget::stderr()
    } else {
        ProgressDrawTarget::hidden()
    });
    if let Ok(style) = ProgressStyle::default_spinner().template(template) {
        pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub mod templates {
    pub const LOADING: &str = "{spinner:.cyan} LOAD {msg} ({elapsed})";
    pub const WRITING: &str = "{spinner:.green} SYNTH {msg} ({elapsed})";
}
