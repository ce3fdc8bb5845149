mod quiz;
mod result;
mod status;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::models::SessionStatus;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.session().status() {
        SessionStatus::NotStarted | SessionStatus::Loading => status::render_loading(frame, area, app),
        SessionStatus::InProgress => quiz::render(frame, area, app),
        SessionStatus::Submitting => status::render_submitting(frame, area, app),
        SessionStatus::Completed => result::render(frame, area, app),
        SessionStatus::Failed(_) => status::render_failed(frame, area, app),
    }
}
