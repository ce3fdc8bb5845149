use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{Question, QuizResult};

/// Longest question text shown on a breakdown row.
const PREVIEW_CHARS: usize = 48;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let Some(result) = session.result() else {
        return;
    };
    let title = session.quiz().map_or("Quiz", |quiz| quiz.title.as_str());

    let [summary, breakdown, controls] = Layout::vertical([
        Constraint::Length(7),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(area);

    frame.render_widget(summary_widget(title, &result), summary);
    render_breakdown(frame, breakdown, app);
    frame.render_widget(
        Paragraph::new("j/k scroll  ·  r new attempt  ·  q quit")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        controls,
    );
}

fn score_color(percentage: f64) -> Color {
    if percentage >= 80.0 {
        Color::Green
    } else if percentage >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn summary_widget<'a>(title: &'a str, result: &QuizResult) -> Paragraph<'a> {
    let percentage = result.percentage();
    let lines = vec![
        Line::from(Span::styled(
            format!("{} submitted", title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} of {} correct ({:.0}%)",
                result.score, result.total_questions, percentage
            ),
            Style::default()
                .fg(score_color(percentage))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} points earned", result.points_earned)),
    ];

    Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
}

fn render_breakdown(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let Some(quiz) = session.quiz() else {
        return;
    };

    let rows: Vec<Line> = quiz
        .questions
        .iter()
        .zip(session.breakdown())
        .zip(session.answers().as_slice())
        .enumerate()
        .map(|(index, ((question, correct), answer))| {
            breakdown_row(index, question, correct, answer.as_deref())
        })
        .collect();

    let widget = Paragraph::new(rows)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Answers ")
                .padding(Padding::horizontal(1)),
        )
        .scroll((app.result_scroll() as u16, 0));
    frame.render_widget(widget, area);
}

fn breakdown_row<'a>(
    index: usize,
    question: &'a Question,
    correct: bool,
    answer: Option<&'a str>,
) -> Line<'a> {
    let (mark, color) = if correct {
        ("ok", Color::Green)
    } else {
        ("x ", Color::Red)
    };
    let mut spans = vec![
        Span::styled(format!("{} ", mark), Style::default().fg(color)),
        Span::styled(
            format!("{:>2}. ", index + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(preview(&question.text)),
    ];
    if !correct {
        spans.push(Span::styled(
            format!(
                "  [{} / {}]",
                answer.unwrap_or("no answer"),
                question.correct_option
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_cuts_on_char_boundary() {
        assert_eq!(preview("short"), "short");

        let long = "é".repeat(PREVIEW_CHARS + 5);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));

        let exact = "x".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);
    }

    #[test]
    fn test_score_color() {
        assert_eq!(score_color(100.0), Color::Green);
        assert_eq!(score_color(66.7), Color::Yellow);
        assert_eq!(score_color(0.0), Color::Red);
    }

    #[test]
    fn test_wrong_answer_row_shows_both_options() {
        let question = Question {
            id: "1".into(),
            text: "Which hook runs side effects?".into(),
            options: vec!["useState".into(), "useEffect".into()],
            correct_option: "useEffect".into(),
        };

        let row = breakdown_row(0, &question, false, None);
        let text: String = row.spans.iter().map(|span| &*span.content).collect();
        assert!(text.contains("[no answer / useEffect]"));

        let row = breakdown_row(0, &question, true, Some("useEffect"));
        assert_eq!(row.spans.len(), 3);
    }
}
