use ratatui::{
    prelude::*,
    widgets::{Gauge, Paragraph, Wrap},
};

use crate::app::App;
use crate::session::Feedback;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let Some(question) = session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    let title = session.quiz().map_or("", |quiz| quiz.title.as_str());
    frame.render_widget(Paragraph::new(title).bold().fg(Color::Cyan), chunks[0]);
    render_progress(frame, chunks[1], app);
    render_question_text(frame, chunks[3], session.current_index(), &question.text);

    let chosen = session.answers().get(session.current_index());
    render_options(frame, chunks[4], &question.options, app.selected_option(), chosen);

    if let Some(feedback) = session.feedback() {
        render_feedback(frame, chunks[5], feedback);
    } else if let Some(notice) = app.notice() {
        frame.render_widget(Paragraph::new(notice).fg(Color::Yellow), chunks[5]);
    }

    let advance = if session.is_last_question() { "finish" } else { "next" };
    render_controls(frame, chunks[6], advance);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let progress = session.progress_percent();
    let label = format!(
        "{}/{}",
        session.current_index() + 1,
        session.total_questions()
    );

    let widget = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio((progress / 100.0).clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, index: usize, text: &str) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Question {}", index + 1),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(text, Style::default().fg(Color::White).bold())),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    options: &[String],
    selected: usize,
    chosen: Option<&str>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_selected = index == selected;
        let is_chosen = chosen == Some(option.as_str());
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };
        let radio = if is_chosen { "(*)" } else { "( )" };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{} {}. ", radio, label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, feedback: &Feedback) {
    let color = if feedback.is_correct {
        Color::Green
    } else {
        Color::Red
    };
    let widget = Paragraph::new(feedback.message())
        .fg(color)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, advance: &str) {
    let widget = Paragraph::new(format!(
        "j/k navigate  ·  enter select  ·  n {}  ·  q quit",
        advance
    ))
    .alignment(Alignment::Center)
    .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
