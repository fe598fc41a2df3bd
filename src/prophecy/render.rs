//! Prophecy Flame rendering: flame panel, upgrade list, log, and the
//! milestone overlay.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::engine::ProgressionEngine;
use super::logic::format_number;
use super::snapshot::Snapshot;
use super::state::{BlessingKind, GameState};

/// Flame art, three frames picked by click power.
const FLAME_ART: &[&[&str]] = &[
    &["   (   ", "  ) )  ", " (___) "],
    &["  ( )  ", " ( ) ) ", " (___) "],
    &[" ((()) ", " ())(( ", " (___) "],
];

pub fn render(
    engine: &ProgressionEngine,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let snap = engine.snapshot();
    let narrow = is_narrow_layout(area.width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    render_flame(&snap, f, chunks[0], click_state);

    if narrow {
        let upgrade_height = (snap.upgrades.len() as u16 + 5).min(chunks[1].height);
        let content = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(upgrade_height), Constraint::Min(3)])
            .split(chunks[1]);
        render_upgrades(engine.state(), &snap, f, content[0], click_state);
        render_log(engine.state(), f, content[1]);
    } else {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);
        render_upgrades(engine.state(), &snap, f, content[0], click_state);
        render_log(engine.state(), f, content[1]);
    }

    render_help(f, chunks[2], click_state);

    // Overlay last so its targets sit on top.
    if snap.milestone_pending {
        render_milestone_overlay(&snap, f, area, click_state);
    }
}

/// Text progress bar, `width` cells wide.
fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Key label for the `idx`-th visible upgrade: 1..9, then 0.
fn upgrade_key_label(idx: usize) -> Option<char> {
    match idx {
        0..=8 => Some((b'1' + idx as u8) as char),
        9 => Some('0'),
        _ => None,
    }
}

/// A `width` x `height` rect centred in `area`, shrunk to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

fn render_flame(
    snap: &Snapshot,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let b = &snap.bonuses;
    let art_idx = if b.click_power >= b.max_click_power * 0.75 {
        2
    } else if b.click_power > 1.0 {
        1
    } else {
        0
    };
    let art = FLAME_ART[art_idx];
    let flame_style = Style::default()
        .fg(if art_idx == 2 { Color::LightRed } else { Color::Yellow })
        .add_modifier(Modifier::BOLD);

    let bar_width = (area.width.saturating_sub(24) as usize).clamp(10, 40);

    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(art[0], flame_style),
        Span::styled(
            format!(" ✦ {} energy", format_number(snap.divine_energy.floor())),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]));
    cl.push(Line::from(vec![
        Span::styled(art[1], flame_style),
        Span::styled(
            format!(
                " Click {:.1}/{} (+{}/click)",
                b.click_power,
                format_number(b.max_click_power),
                format_number(snap.click_value)
            ),
            Style::default().fg(Color::White),
        ),
    ]));
    cl.push(Line::from(vec![
        Span::styled(art[2], flame_style),
        Span::styled(
            format!(
                " Passive {:.1}/{} (+{:.2}/s idle)",
                b.passive_gain,
                format_number(b.max_passive_gain),
                snap.passive_value
            ),
            Style::default().fg(Color::White),
        ),
    ]));
    cl.push(Line::from(vec![
        Span::styled(
            format!(" {} ", progress_bar(snap.prophecy_progress, bar_width)),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!(
                "{:.1}% of {}",
                snap.prophecy_progress,
                format_number(snap.requirement)
            ),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
    ]));

    let blessing_spans: Vec<Span> = BlessingKind::all()
        .iter()
        .map(|&kind| {
            Span::styled(
                format!(" {} {:.2} ", kind.name(), snap.blessings.get(kind)),
                Style::default().fg(Color::Cyan),
            )
        })
        .collect();
    cl.push(Line::from(blessing_spans));

    let paths = &snap.completed_paths;
    cl.push(Line::from(Span::styled(
        format!(
            " Prophecies {} · Patience {} · Persistence {} · Piety {}",
            snap.completions, paths.patience, paths.persistence, paths.piety
        ),
        Style::default().fg(Color::DarkGray),
    )));
    cl.push_clickable(
        Line::from(Span::styled(
            " [C] Tend the flame",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        CLICK_FLAME,
    );

    let mut cs = click_state.borrow_mut();
    // Anywhere on the panel counts as a flame click.
    cs.add_click_target(area, CLICK_FLAME);
    cl.register_targets(area, &mut cs, 1, 1, 0, 0);

    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" ✦ Prophecy Flame ✦ "),
    );
    f.render_widget(widget, area);
}

fn render_upgrades(
    state: &GameState,
    snap: &Snapshot,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();

    for (i, u) in snap.upgrades.iter().enumerate() {
        let Some(key) = upgrade_key_label(i) else {
            break;
        };
        let (key_style, text_style) = if u.affordable {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" [{}] ", key), key_style),
                Span::styled(format!("{} Lv.{} ", u.name, u.level), text_style),
                Span::styled(
                    format!("({})", format_number(u.effective_cost)),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
            BUY_UPGRADE_BASE + i as u16,
        );
    }

    let hidden = state.upgrades.len() - snap.upgrades.len();
    if hidden > 0 {
        cl.push(Line::from(Span::styled(
            format!(" {} more revealed as the prophecy grows", hidden),
            Style::default().fg(Color::DarkGray),
        )));
    }

    cl.push(Line::from(""));
    let attune_style = if snap.play_style.is_some() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [P] ", attune_style.add_modifier(Modifier::BOLD)),
            Span::styled(snap.play_style_advice.clone(), attune_style),
        ]),
        APPLY_PLAY_STYLE,
    );

    let inner_width = area.width.saturating_sub(2);
    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0, inner_width);
    }

    let widget = Paragraph::new(cl.into_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(" Upgrades "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_log(state: &GameState, f: &mut Frame, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;

    // Newest first
    let log_lines: Vec<Line> = state
        .log
        .iter()
        .rev()
        .take(visible_height)
        .enumerate()
        .map(|(i, entry)| {
            let style = match (entry.is_important, i < 3) {
                (true, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(log_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

/// Help bar segments and the action each one triggers when tapped.
const HELP_SEGMENTS: &[(&str, Option<u16>)] = &[
    (" [C] Click ", Some(CLICK_FLAME)),
    (" [1-0] Buy ", None),
    (" [P] Attune ", Some(APPLY_PLAY_STYLE)),
    (" [R] Reset ", Some(RESET)),
];

fn render_help(f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    let spans: Vec<Span> = HELP_SEGMENTS
        .iter()
        .map(|(label, _)| Span::styled(*label, Style::default().fg(Color::DarkGray)))
        .collect();

    {
        let mut cs = click_state.borrow_mut();
        let mut x = inner.x;
        for (span, (_, action)) in spans.iter().zip(HELP_SEGMENTS) {
            let w = span.width() as u16;
            if let Some(action_id) = action {
                let visible = w.min((inner.x + inner.width).saturating_sub(x));
                if visible > 0 {
                    cs.add_click_target(Rect::new(x, area.y, visible, area.height), *action_id);
                }
            }
            x = x.saturating_add(w);
        }
    }

    let help = Paragraph::new(Line::from(spans)).block(block);
    f.render_widget(help, area);
}

fn render_milestone_overlay(
    snap: &Snapshot,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        " The prophecy is fulfilled. Choose your path:",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));

    for ((i, choice), key) in snap.milestone_choices.iter().enumerate().zip(PATH_KEYS) {
        let key = key.to_ascii_uppercase();
        let action_id = CHOOSE_PATH_BASE + i as u16;
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!(" [{}] ", key),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{} (level {})", choice.title, choice.level),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            action_id,
        );
        for effect in &choice.effects {
            cl.push_clickable(
                Line::from(Span::styled(
                    format!("     • {}", effect),
                    Style::default().fg(Color::Gray),
                )),
                action_id,
            );
        }
    }

    let height = cl.len() as u16 + 2;
    let overlay = centered_rect(area, 56, height);

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(overlay, &mut cs, 1, 1, 0, 0);
    }

    f.render_widget(Clear, overlay);
    let widget = Paragraph::new(cl.into_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightMagenta))
                .title(" ✦ Milestone ✦ "),
        )
        .alignment(Alignment::Left);
    f.render_widget(widget, overlay);
}
