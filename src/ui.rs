//! Terminal UI rendering for the NeuroTask TUI.
//!
//! Layout, top to bottom:
//! - Header: product name and the service base URL
//! - Task form: title, description, AI autocomplete hint
//! - Filter bar: one entry per status filter, with counts over the full set
//! - Task list ("Mis Tareas") with loading and empty states
//! - Status bar: context-sensitive keymap, toggled by '?'
//!
//! Overlays (edit modal, status picker, delete confirmation, AI insight)
//! are drawn over the list. This module renders from RenderState (immutable
//! snapshot) - it never mutates application state.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::{StatusFilter, TaskStatus};
use crate::render::{RenderState, TaskView};
use crate::tea::{FormField, Insight, Mode, Notification, NotificationLevel};

// Color tokens (selection uses REVERSED modifier to adapt to terminal theme)
const COLOR_TEXT_DIMMED: Color = Color::Gray;
const COLOR_TEXT_MUTED: Color = Color::DarkGray;
const COLOR_SEPARATOR: Color = Color::White;
const COLOR_ACCENT: Color = Color::Magenta;

// Status color coding (uses terminal palette)
const COLOR_STATUS_PENDING: Color = Color::Yellow;
const COLOR_STATUS_IN_PROGRESS: Color = Color::Blue;
const COLOR_STATUS_COMPLETED: Color = Color::Green;
const COLOR_STATUS_CANCELED: Color = Color::Red;

// Layout constants
const HEADER_HEIGHT: u16 = 1;
const FORM_HEIGHT: u16 = 4;
const FILTER_HEIGHT: u16 = 1;
const MODAL_WIDTH: u16 = 60;

// Column widths for the task list
const STATUS_WIDTH: usize = 14;
const TITLE_WIDTH: usize = 32;
const SPACING: usize = 2;

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => COLOR_STATUS_PENDING,
        TaskStatus::InProgress => COLOR_STATUS_IN_PROGRESS,
        TaskStatus::Completed => COLOR_STATUS_COMPLETED,
        TaskStatus::Canceled => COLOR_STATUS_CANCELED,
    }
}

// -----------------------------------------------------------------------------
// Context-sensitive keymap system
// -----------------------------------------------------------------------------

/// Context for determining which keybindings to display.
/// Derived from RenderState - this is the "view model" for the statusbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapContext {
    /// Normal list browsing - task actions only when a task is selected
    List { has_selection: bool },
    /// Typing into the new-task form
    Form,
    /// Typing into the edit modal
    Edit,
    StatusPick,
    DeleteConfirm,
    Insight,
}

impl KeymapContext {
    /// Derive keymap context from render state.
    pub fn from_render_state(state: &RenderState) -> Self {
        match state.mode {
            Mode::List => KeymapContext::List {
                has_selection: state.selected < state.tasks.len(),
            },
            Mode::Form(_) => KeymapContext::Form,
            Mode::Edit(_) => KeymapContext::Edit,
            Mode::StatusPick => KeymapContext::StatusPick,
            Mode::Confirm => KeymapContext::DeleteConfirm,
            Mode::Insight => KeymapContext::Insight,
        }
    }
}

/// A single keybinding entry for display.
struct Keybinding(&'static str, &'static str);

/// A group of related keybindings (separated by │).
struct KeybindingGroup(Vec<Keybinding>);

/// Get keybindings for a given context.
fn keybindings_for_context(ctx: KeymapContext) -> Vec<KeybindingGroup> {
    match ctx {
        KeymapContext::List { has_selection } => {
            let task_actions = if has_selection {
                vec![
                    Keybinding("e", "editar"),
                    Keybinding("s", "estado"),
                    Keybinding("d", "eliminar"),
                ]
            } else {
                vec![]
            };

            vec![
                KeybindingGroup(vec![Keybinding("n", "nueva"), Keybinding("r", "recargar")]),
                KeybindingGroup(task_actions),
                KeybindingGroup(vec![
                    Keybinding("h/l", "filtro"),
                    Keybinding("0-4", "filtro directo"),
                ]),
                KeybindingGroup(vec![Keybinding("i", "resumen"), Keybinding("p", "prioridades")]),
                KeybindingGroup(vec![Keybinding("q", "salir")]),
            ]
        }
        KeymapContext::Form => vec![KeybindingGroup(vec![
            Keybinding("Enter", "crear"),
            Keybinding("Tab", "campo"),
            Keybinding("Ctrl+G", "autocompletar"),
            Keybinding("Esc", "volver"),
        ])],
        KeymapContext::Edit => vec![KeybindingGroup(vec![
            Keybinding("Enter", "guardar"),
            Keybinding("Tab", "campo"),
            Keybinding("Esc", "cancelar"),
        ])],
        KeymapContext::StatusPick => vec![KeybindingGroup(vec![
            Keybinding("j/k", "elegir"),
            Keybinding("Enter", "aplicar"),
            Keybinding("Esc", "cancelar"),
        ])],
        KeymapContext::DeleteConfirm => vec![KeybindingGroup(vec![
            Keybinding("Enter", "eliminar"),
            Keybinding("Esc", "cancelar"),
        ])],
        KeymapContext::Insight => vec![KeybindingGroup(vec![Keybinding("Esc", "cerrar")])],
    }
}

/// Main render function - entry point for all UI drawing.
/// Takes an immutable RenderState snapshot.
pub fn draw(frame: &mut Frame, state: &RenderState) {
    render_main_layout(frame, state);

    let area = frame.area();
    match state.mode {
        Mode::Edit(field) => {
            if let Some(ref editor) = state.editor {
                render_edit_modal(frame, area, &editor.title, &editor.description, editor.saving, field);
            }
        }
        Mode::StatusPick => {
            if let Some(picked) = state.picker {
                render_status_picker(frame, area, picked);
            }
        }
        Mode::Confirm => {
            if let Some(ref title) = state.confirm_delete {
                render_confirm(frame, area, title);
            }
        }
        Mode::Insight => {
            if let Some(ref insight) = state.insight {
                render_insight(frame, area, insight);
            }
        }
        Mode::List | Mode::Form(_) => {}
    }

    // Render notification if present
    if let Some(ref notification) = state.notification {
        render_notification(frame, notification, area);
    }
}

/// Render the main layout: header + form + separator + filters + list + status bar.
fn render_main_layout(frame: &mut Frame, state: &RenderState) {
    let area = frame.area();

    if area.height < HEADER_HEIGHT + FORM_HEIGHT + FILTER_HEIGHT + 4 {
        render_task_list(frame, state, area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(FORM_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(FILTER_HEIGHT),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, state, chunks[0]);
    render_form(frame, state, chunks[1]);
    render_separator(frame, chunks[2]);
    render_filter_bar(frame, state, chunks[3]);
    render_task_list(frame, state, chunks[4]);
    render_statusbar(frame, state, chunks[5]);
}

fn render_header(frame: &mut Frame, state: &RenderState, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "NeuroTask AI",
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ", Style::default()),
        Span::styled(state.base_url.clone(), Style::default().fg(COLOR_TEXT_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the new-task form. The focused field shows a cursor.
fn render_form(frame: &mut Frame, state: &RenderState, area: Rect) {
    let focused = match state.mode {
        Mode::Form(field) => Some(field),
        _ => None,
    };
    let form = &state.form;

    let heading_style = if focused.is_some() {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_TEXT_DIMMED)
    };

    let hint = if form.submitting {
        Span::styled("Creando tarea...", Style::default().fg(COLOR_TEXT_DIMMED))
    } else if form.autocompleting {
        Span::styled(
            "Generando descripción con IA...",
            Style::default().fg(COLOR_ACCENT),
        )
    } else if form.can_autocomplete && focused.is_some() {
        Span::styled(
            "Ctrl+G: autocompletar descripción con IA",
            Style::default().fg(COLOR_TEXT_MUTED),
        )
    } else {
        Span::raw("")
    };

    let lines = vec![
        Line::from(Span::styled("Nueva tarea", heading_style)),
        field_line(FormField::Title, &form.title, focused == Some(FormField::Title), area.width),
        field_line(
            FormField::Description,
            &form.description,
            focused == Some(FormField::Description),
            area.width,
        ),
        Line::from(hint),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// One labelled input line; the focused field gets a blinking cursor.
fn field_line(field: FormField, value: &str, focused: bool, width: u16) -> Line<'static> {
    let label = format!("{}: ", field.label());
    let label_style = if focused {
        Style::default().fg(Color::Reset)
    } else {
        Style::default().fg(COLOR_TEXT_MUTED)
    };
    // Keep the tail visible while typing past the edge.
    let room = (width as usize).saturating_sub(label.chars().count() + 1);
    let count = value.chars().count();
    let visible: String = value.chars().skip(count.saturating_sub(room)).collect();

    let mut spans = vec![
        Span::styled(label, label_style),
        Span::styled(visible, Style::default().fg(Color::White)),
    ];
    if focused {
        spans.push(Span::styled(
            "_",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}

/// Render the separator - solid divider line between form and list.
fn render_separator(frame: &mut Frame, area: Rect) {
    let solid = "─".repeat(area.width as usize);
    let line = Line::from(Span::styled(solid, Style::default().fg(COLOR_SEPARATOR)));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the filter bar: `Todas (N)` followed by each status with its count.
fn render_filter_bar(frame: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, option) in StatusFilter::OPTIONS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Style::default()));
        }
        spans.push(Span::styled(filter_label(*option, state), filter_style(*option, state)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn filter_label(filter: StatusFilter, state: &RenderState) -> String {
    let count = state.counts.get(filter);
    match filter.icon() {
        Some(icon) => format!("{icon} {} ({count})", filter.label()),
        None => format!("{} ({count})", filter.label()),
    }
}

fn filter_style(filter: StatusFilter, state: &RenderState) -> Style {
    if filter == state.filter {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        match filter.status() {
            Some(status) => Style::default().fg(status_color(status)),
            None => Style::default().fg(COLOR_TEXT_DIMMED),
        }
    }
}

/// Render the task list with scrolloff navigation.
fn render_task_list(frame: &mut Frame, state: &RenderState, area: Rect) {
    let heading = Line::from(vec![
        Span::styled("Mis Tareas", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  ({})", state.tasks.len()),
            Style::default().fg(COLOR_TEXT_MUTED),
        ),
    ]);

    if state.loading && state.tasks.is_empty() {
        let lines = vec![
            heading,
            Line::from(Span::styled(
                "Cargando tareas...",
                Style::default().fg(COLOR_TEXT_DIMMED),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }

    if state.tasks.is_empty() {
        let lines = vec![heading, Line::raw("")]
            .into_iter()
            .chain(empty_state_lines(state.filter))
            .collect::<Vec<_>>();
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }

    let show_selection = matches!(state.mode, Mode::List | Mode::StatusPick | Mode::Confirm);
    let detail = state
        .tasks
        .get(state.selected)
        .filter(|_| show_selection)
        .and_then(detail_line);

    // Reserve lines for the heading and the detail line
    let reserved = 1 + u16::from(detail.is_some());
    let content_height = area.height.saturating_sub(reserved) as usize;

    // Scrolloff implementation: keep selection centered
    let center = content_height / 2;
    let start = state.selected.saturating_sub(center);
    let end = (start + content_height).min(state.tasks.len());
    let start = end.saturating_sub(content_height);

    let mut lines: Vec<Line> = Vec::with_capacity(content_height + 2);
    lines.push(heading);
    lines.extend(
        state
            .tasks
            .iter()
            .enumerate()
            .skip(start)
            .take(content_height)
            .map(|(idx, task)| {
                render_task_row(task, show_selection && idx == state.selected, area.width)
            }),
    );
    lines.extend(detail);

    frame.render_widget(Paragraph::new(lines), area);
}

/// Timestamps of the selected task, when the service reported any.
fn detail_line(task: &TaskView) -> Option<Line<'static>> {
    let stamps: Vec<String> = [("Creada", task.created_at), ("Actualizada", task.updated_at)]
        .into_iter()
        .filter_map(|(label, at)| at.map(|at| format!("{label}: {}", at.format(TIMESTAMP_FORMAT))))
        .collect();
    if stamps.is_empty() {
        return None;
    }
    Some(Line::from(Span::styled(
        stamps.join("  "),
        Style::default().fg(COLOR_TEXT_MUTED),
    )))
}

fn empty_state_lines(filter: StatusFilter) -> Vec<Line<'static>> {
    let headline = if filter.is_all() {
        "No hay tareas"
    } else {
        "No hay tareas con este estado"
    };
    let mut lines = vec![Line::from(Span::styled(
        headline,
        Style::default().fg(COLOR_TEXT_DIMMED),
    ))];
    if filter.is_all() {
        lines.push(Line::from(Span::styled(
            "Crea tu primera tarea para comenzar (n)",
            Style::default().fg(COLOR_TEXT_MUTED),
        )));
    }
    lines
}

/// Render a single task row.
/// Columns: STATUS (icon + label) | TITLE | DESCRIPTION (flex)
fn render_task_row(task: &TaskView, is_selected: bool, width: u16) -> Line<'static> {
    let status = format!("{} {}", task.status.icon(), task.status.label());
    let status_padded = pad(&status, STATUS_WIDTH);

    let title = pad(&truncate(&task.title, TITLE_WIDTH), TITLE_WIDTH);

    let description_width = (width as usize).saturating_sub(STATUS_WIDTH + TITLE_WIDTH + SPACING * 2);
    let description = truncate(&first_line(&task.description), description_width);

    let spacing = " ".repeat(SPACING);

    let (status_style, primary_style, secondary_style) = if is_selected {
        let selected = Style::default().add_modifier(Modifier::REVERSED);
        (selected, selected, selected)
    } else {
        (
            Style::default().fg(status_color(task.status)),
            Style::default(),
            Style::default().fg(COLOR_TEXT_DIMMED),
        )
    };

    Line::from(vec![
        Span::styled(status_padded, status_style),
        Span::styled(spacing.clone(), primary_style),
        Span::styled(title, primary_style),
        Span::styled(spacing, primary_style),
        Span::styled(description, secondary_style),
    ])
}

/// Render the HUD status bar - single bottom line.
/// When show_keymap is false: Shows just "?" (grayed out)
/// When show_keymap is true: Shows "? │ <full keymap legend>" with bright "?"
fn render_statusbar(frame: &mut Frame, state: &RenderState, area: Rect) {
    frame.render_widget(Paragraph::new(render_keymap_line(state)), area);
}

fn render_keymap_line(state: &RenderState) -> Line<'static> {
    let ctx = KeymapContext::from_render_state(state);
    let groups = keybindings_for_context(ctx);

    let key_style = Style::default().fg(COLOR_TEXT_DIMMED);
    let desc_style = Style::default().fg(COLOR_TEXT_MUTED);
    let sep_style = Style::default().fg(COLOR_TEXT_MUTED);

    let help_style = if state.show_keymap {
        Style::default()
    } else {
        Style::default().fg(COLOR_TEXT_MUTED)
    };
    let mut spans: Vec<Span> = vec![Span::styled("?", help_style)];

    if state.show_keymap {
        for group in groups.iter().filter(|g| !g.0.is_empty()) {
            spans.push(Span::styled(" │ ", sep_style));
            for (key_idx, keybinding) in group.0.iter().enumerate() {
                if key_idx > 0 {
                    spans.push(Span::styled(" • ", sep_style));
                }
                spans.push(Span::styled(keybinding.0, key_style));
                spans.push(Span::styled(format!(" {}", keybinding.1), desc_style));
            }
        }
    }

    Line::from(spans)
}

// -----------------------------------------------------------------------------
// Overlays
// -----------------------------------------------------------------------------

fn modal_block(title: &str) -> Block<'static> {
    Block::bordered()
        .title(format!(" {title} "))
        .border_style(Style::default().fg(COLOR_TEXT_DIMMED))
}

fn render_edit_modal(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    description: &str,
    saving: bool,
    field: FormField,
) {
    let rect = centered_rect(area, MODAL_WIDTH, 7);
    frame.render_widget(Clear, rect);

    let block = modal_block("Editar Tarea");
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let footer = if saving {
        Span::styled("Guardando...", Style::default().fg(COLOR_TEXT_DIMMED))
    } else {
        Span::styled(
            "Enter: Guardar Cambios  Esc: Cancelar",
            Style::default().fg(COLOR_TEXT_MUTED),
        )
    };

    let lines = vec![
        field_line(FormField::Title, title, field == FormField::Title, inner.width),
        Line::raw(""),
        field_line(
            FormField::Description,
            description,
            field == FormField::Description,
            inner.width,
        ),
        Line::raw(""),
        Line::from(footer),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status_picker(frame: &mut Frame, area: Rect, picked: TaskStatus) {
    let height = TaskStatus::ALL.len() as u16 + 2;
    let rect = centered_rect(area, 30, height);
    frame.render_widget(Clear, rect);

    let block = modal_block("Cambiar estado");
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let lines: Vec<Line> = TaskStatus::ALL
        .iter()
        .map(|status| {
            let style = if *status == picked {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(status_color(*status))
            };
            Line::from(Span::styled(
                format!("{} {}", status.icon(), status.label()),
                style,
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_confirm(frame: &mut Frame, area: Rect, title: &str) {
    let rect = centered_rect(area, MODAL_WIDTH, 5);
    frame.render_widget(Clear, rect);

    let block = modal_block("Eliminar tarea");
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let lines = vec![
        Line::from(vec![
            Span::raw("¿Estás seguro de que quieres eliminar "),
            Span::styled(
                truncate(title, inner.width.saturating_sub(40) as usize),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("?"),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            "Enter: eliminar  Esc: cancelar",
            Style::default().fg(COLOR_TEXT_MUTED),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_insight(frame: &mut Frame, area: Rect, insight: &Insight) {
    let rect = centered_rect(area, 70, area.height.saturating_sub(4).max(5));
    frame.render_widget(Clear, rect);

    let block = modal_block(insight.title());
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let lines: Vec<Line> = match insight {
        Insight::LoadingSummary | Insight::LoadingPriorities => vec![Line::from(Span::styled(
            "Consultando a la IA...",
            Style::default().fg(COLOR_ACCENT),
        ))],
        Insight::Summary(text) => text.lines().map(|l| Line::raw(l.to_string())).collect(),
        Insight::Priorities(hints) if hints.is_empty() => vec![Line::from(Span::styled(
            "No hay tareas pendientes",
            Style::default().fg(COLOR_TEXT_DIMMED),
        ))],
        Insight::Priorities(hints) => hints
            .iter()
            .flat_map(|hint| {
                [
                    Line::from(Span::styled(
                        hint.task_title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("  {}", hint.suggestion),
                        Style::default().fg(COLOR_TEXT_DIMMED),
                    )),
                ]
            })
            .collect(),
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Render notification message on the bottom line of the screen.
///
/// Displays a single-line notification with appropriate styling based on the notification level:
/// - Error: Red text with "Error:" prefix and bold styling
/// - Info: Green text without prefix
fn render_notification(frame: &mut Frame, notification: &Notification, area: Rect) {
    let notification_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, notification_area);

    let line = match notification.level {
        NotificationLevel::Error => Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                notification.message.clone(),
                Style::default().fg(Color::Red),
            ),
        ]),
        NotificationLevel::Info => Line::from(Span::styled(
            notification.message.clone(),
            Style::default().fg(Color::Green),
        )),
    };

    frame.render_widget(Paragraph::new(line), notification_area);
}

// Helper functions

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or("").to_string()
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}

fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 1).collect();
        format!("{}~", truncated)
    }
}
