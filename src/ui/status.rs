//! Screens shown while waiting on the backend or after a failure.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::FailedStage;

fn centered_box(area: Rect, height: u16) -> Rect {
    Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area)[1]
}

fn boxed(content: Vec<Line<'_>>) -> Paragraph<'_> {
    Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        )
}

pub fn render_loading(frame: &mut Frame, area: Rect, app: &App) {
    let quiz_id = app
        .session()
        .quiz_id()
        .map(ToString::to_string)
        .unwrap_or_default();

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("QUIZ", Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!("Loading quiz {}...", quiz_id),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from("q to leave".fg(Color::DarkGray)),
    ];

    frame.render_widget(boxed(content), centered_box(area, 8));
}

pub fn render_submitting(frame: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Submitting your answers...",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
    ];

    // Shown optimistically until the backend confirms.
    if let Some(provisional) = app.session().provisional_result() {
        content.push(Line::from(Span::styled(
            format!(
                "Your score: {}/{}  ·  {} points",
                provisional.score, provisional.total_questions, provisional.points_earned
            ),
            Style::default().fg(Color::Gray),
        )));
    }

    frame.render_widget(boxed(content), centered_box(area, 7));
}

pub fn render_failed(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let Some(failure) = session.failure() else {
        return;
    };

    let heading = match failure.stage() {
        FailedStage::Load => "COULD NOT LOAD QUIZ",
        FailedStage::Submit => "COULD NOT SUBMIT ANSWERS",
    };
    let controls = if failure.is_retryable() {
        "r retry  ·  q quit"
    } else {
        "q quit"
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(heading, Style::default().fg(Color::Red).bold())),
        Line::from(""),
        Line::from(Span::styled(failure.message(), Style::default().fg(Color::White))),
        Line::from(""),
    ];
    if let Some(notice) = app.notice() {
        content.push(Line::from(notice.fg(Color::Yellow)));
    }
    content.push(Line::from(controls.fg(Color::DarkGray)));

    frame.render_widget(boxed(content), centered_box(area, 10));
}
