//! Rendering of the wizard screens.

use prakriti::{Choice, Field, Phase, validate};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::wizard::WizardState;

pub(crate) fn draw_ui(frame: &mut Frame, state: &WizardState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(2), // Progress bar
            Constraint::Min(10),   // Content
            Constraint::Length(3), // Help
        ])
        .split(area);

    let header = Paragraph::new(state.title.clone())
        .style(Style::default().fg(state.theme.primary).bold())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(state.theme.border)),
        );
    frame.render_widget(header, chunks[0]);

    draw_progress(frame, state, chunks[1]);

    match state.flow.phase() {
        Phase::Loading => draw_notice(frame, state, chunks[2], "Loading questions..."),
        Phase::Answering { .. } => draw_question(frame, state, chunks[2]),
        Phase::CollectingInfo => draw_form(frame, state, chunks[2]),
        Phase::Submitting => draw_notice(frame, state, chunks[2], "Submitting your answers..."),
        Phase::Result(_) => draw_result(frame, state, chunks[2]),
        Phase::Error(message) => draw_error(frame, state, chunks[2], message),
    }

    let help = Paragraph::new(help_text(state.flow.phase()))
        .style(Style::default().fg(state.theme.border))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(state.theme.border)),
        );
    frame.render_widget(help, chunks[3]);
}

fn help_text(phase: &Phase) -> &'static str {
    match phase {
        Phase::Loading | Phase::Submitting => "Please wait · Ctrl+C: quit",
        Phase::Answering { .. } => "↑↓: select · Enter or a/b/c: answer · ←: back · Esc: quit",
        Phase::CollectingInfo => {
            "Tab/↑↓: move · ←→: gender · Enter: submit · Esc: back to questions"
        }
        Phase::Result(_) => "Enter: start again · e: save CSV export · Esc: quit",
        Phase::Error(_) => "r: retry · Esc: quit",
    }
}

/// Thin bar with an `answered / total` caption.
fn draw_progress(frame: &mut Frame, state: &WizardState, area: Rect) {
    let (answered, total) = state.flow.progress();
    if total == 0 {
        return;
    }
    let caption = format!(" {answered} / {total} ");

    let bar_width = area.width.saturating_sub(2);
    let text_width = caption.len() as u16;
    let ratio = answered as f32 / total as f32;
    let filled_width = (ratio * bar_width as f32) as u16;
    let bar_x = area.x + 1;

    let track = Paragraph::new("─".repeat(bar_width as usize))
        .style(Style::default().fg(state.theme.border));
    frame.render_widget(track, Rect::new(bar_x, area.y, bar_width, 1));

    if filled_width > 0 {
        let filled = Paragraph::new("━".repeat(filled_width as usize))
            .style(Style::default().fg(state.theme.primary));
        frame.render_widget(filled, Rect::new(bar_x, area.y, filled_width, 1));
    }

    let text_x = bar_x + bar_width.saturating_sub(text_width) / 2;
    let text = Paragraph::new(caption).style(Style::default().fg(state.theme.secondary));
    frame.render_widget(text, Rect::new(text_x, area.y + 1, text_width, 1));
}

fn draw_notice(frame: &mut Frame, state: &WizardState, area: Rect, text: &str) {
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(state.theme.text))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, centered(area, 1));
}

fn draw_question(frame: &mut Frame, state: &WizardState, area: Rect) {
    let Some((index, question)) = state.flow.current_question() else {
        return;
    };
    let total = state.flow.questions().len();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);

    let prompt = Paragraph::new(question.text().to_string())
        .style(Style::default().fg(state.theme.text))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(state.theme.primary))
                .title(format!(" Question {} of {} ", index + 1, total))
                .title_style(Style::default().fg(state.theme.highlight)),
        );
    frame.render_widget(prompt, chunks[0]);

    let answered = state.flow.answers().get(index);
    let items: Vec<ListItem> = Choice::ALL
        .iter()
        .map(|choice| {
            let marker = if answered == Some(*choice) { "●" } else { "○" };
            let style = if answered == Some(*choice) {
                Style::default().fg(state.theme.success)
            } else {
                Style::default().fg(state.theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} {}) ", choice.letter()), style),
                Span::styled(question.option(*choice).to_string(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(state.theme.border))
                .title(" Options "),
        )
        .highlight_style(Style::default().fg(state.theme.highlight).bold())
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_option));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_form(frame: &mut Frame, state: &WizardState, area: Rect) {
    let mut constraints = vec![Constraint::Length(4); Field::ALL.len()];
    constraints.push(Constraint::Min(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let focused = state.focused_field();
    for (field, chunk) in Field::ALL.into_iter().zip(chunks.iter()) {
        let value = state.flow.info().get(field);
        let is_focused = field == focused;

        // Errors from the last submit win; otherwise live feedback once typed.
        let feedback = match state.flow.field_error(field) {
            Some(err) => Some((err.to_string(), state.theme.error)),
            None if !value.is_empty() => {
                let check = validate::check_field(field, value);
                let color = if check.is_valid {
                    state.theme.success
                } else {
                    state.theme.error
                };
                Some((check.message, color))
            }
            None => None,
        };

        let shown = if field == Field::Gender {
            if value.is_empty() {
                "‹ choose ›".to_string()
            } else {
                format!("‹ {value} ›")
            }
        } else if is_focused {
            format!("{value}▏")
        } else {
            value.to_string()
        };

        let mut lines = vec![Line::from(shown)];
        if let Some((message, color)) = feedback {
            lines.push(Line::from(Span::styled(message, Style::default().fg(color))));
        }

        let border = if is_focused {
            state.theme.primary
        } else {
            state.theme.border
        };
        let paragraph = Paragraph::new(lines)
            .style(Style::default().fg(state.theme.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(format!(" {} ", field.label())),
            );
        frame.render_widget(paragraph, *chunk);
    }

    if let Some(last) = chunks.last() {
        let lines: Vec<Line> = state
            .flow
            .messages()
            .iter()
            .map(|m| Line::from(Span::styled(m.clone(), Style::default().fg(state.theme.error))))
            .collect();
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), *last);
    }
}

fn draw_result(frame: &mut Frame, state: &WizardState, area: Rect) {
    let Phase::Result(response) = state.flow.phase() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(state.theme.success))
        .title(" Your prakriti ")
        .title_style(Style::default().fg(state.theme.success).bold());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let counts = response.counts;
    let export = match &state.export_status {
        Some(status) => Line::from(Span::styled(
            status.clone(),
            Style::default().fg(state.theme.secondary),
        )),
        None => Line::from(Span::styled(
            format!(
                "Press e to save all responses to {}",
                state.export_path.display()
            ),
            Style::default().fg(state.theme.border),
        )),
    };
    let lines = vec![
        Line::from(Span::styled(
            response.result.clone(),
            Style::default().fg(state.theme.highlight).bold(),
        )),
        Line::from(""),
        Line::from(response.description.clone()),
        Line::from(""),
        Line::from(format!(
            "Vata: {}   Pitta: {}   Kapha: {}",
            counts.vata, counts.pitta, counts.kapha
        )),
        Line::from(""),
        export,
    ];
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(state.theme.text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, centered(inner, 8));
}

fn draw_error(frame: &mut Frame, state: &WizardState, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(state.theme.error))
        .title(" Something went wrong ")
        .title_style(Style::default().fg(state.theme.error).bold());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(state.theme.text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, centered(inner, 3));
}

/// A band of `height` rows in the vertical middle of `area`.
fn centered(area: Rect, height: u16) -> Rect {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area)[1]
}
