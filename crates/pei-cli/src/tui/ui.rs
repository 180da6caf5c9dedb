//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Tabs, Wrap};

use pei_core::Step;
use pei_core::editor::{EditorView, PlanEditor};
use pei_core::intake::IntakeForm;
use pei_core::notify::NotificationKind;
use pei_core::plan::Section;
use pei_core::profile::Diagnosis;
use pei_core::simulator::PhaseStatus;

use super::app::{App, FORM_ROWS, FormRow, intake_value, row_label};

/// Render the current step.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    match app.wizard.step() {
        Step::Dashboard => render_dashboard(f, app, chunks[0]),
        Step::Intake => {
            if let Some(form) = app.wizard.intake() {
                render_intake(f, app, form, chunks[0]);
            }
        }
        Step::Generation => {
            if let Some(editor) = app.wizard.editor() {
                render_generation(f, app, editor, chunks[0]);
            }
        }
        Step::Complete => render_complete(f, app, chunks[0]),
    }

    render_status_bar(f, app, chunks[1]);
}

fn selected_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

fn heading(text: &str) -> Span<'_> {
    Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

// -- Dashboard --

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let dashboard = app.wizard.dashboard();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(heading("Olá, Professor!")),
        Line::from(vec![
            Span::raw("PEIs Ativos: "),
            Span::styled(
                dashboard.active_count().to_string(),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title(" AutismoPEI "));
    f.render_widget(header, chunks[0]);

    let header_cells = ["Aluno", "Idade", "Atualizado"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let rows = dashboard.recent().iter().map(|record| {
        Row::new(vec![
            Cell::from(record.student_name.clone()),
            Cell::from(format!("{} anos", record.age)),
            Cell::from(record.last_updated_label()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(Row::new(header_cells).height(1))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" PEIs Recentes "),
    );
    f.render_widget(table, chunks[1]);
}

// -- Intake --

fn render_intake(f: &mut Frame, app: &App, form: &IntakeForm, area: Rect) {
    let mut lines = Vec::with_capacity(FORM_ROWS.len() + 2);
    for (i, row) in FORM_ROWS.iter().enumerate() {
        let focused = i == app.form_row;
        let label = Span::styled(
            format!("{:<26}", row_label(*row)),
            Style::default().fg(Color::Yellow),
        );
        let value = match row {
            FormRow::Diagnosis => diagnosis_spans(form, focused.then_some(app.diagnosis_cursor)),
            FormRow::Select(_) => vec![Span::raw(format!("< {} >", intake_value(form, *row)))],
            FormRow::Text(_) => vec![Span::raw(intake_value(form, *row))],
        };
        let mut spans = vec![label];
        spans.extend(value);
        let line = Line::from(spans);
        lines.push(if focused {
            line.style(selected_style())
        } else {
            line
        });
    }

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Informações do Aluno "),
    );
    f.render_widget(body, area);
}

fn diagnosis_spans(form: &IntakeForm, cursor: Option<usize>) -> Vec<Span<'static>> {
    let selected = &form.draft().diagnosis;
    Diagnosis::ALL
        .iter()
        .enumerate()
        .map(|(i, code)| {
            let mark = if selected.contains(code) { "x" } else { " " };
            let text = format!("[{mark}] {}  ", code.label());
            if cursor == Some(i) {
                Span::styled(text, Style::default().fg(Color::Cyan))
            } else {
                Span::raw(text)
            }
        })
        .collect()
}

// -- Generation --

fn render_generation(f: &mut Frame, app: &App, editor: &PlanEditor, area: Rect) {
    match editor.view() {
        EditorView::Prompt => render_prompt(f, editor, area),
        EditorView::Progress => render_progress(f, editor, area),
        EditorView::Editing => render_editing(f, app, editor, area),
    }
}

fn render_prompt(f: &mut Frame, editor: &PlanEditor, area: Rect) {
    let profile = editor.profile();
    let grade = profile.grade.map(|g| g.label()).unwrap_or("-");
    let mut text = vec![
        Line::from(heading("Gerar PEI com IA")),
        Line::from(""),
        Line::from(format!("Aluno: {}", profile.name)),
        Line::from(format!("Idade: {} anos", profile.age)),
    ];
    if let Some(date) = profile.birth_date_parsed() {
        text.push(Line::from(format!("Nascimento: {}", date.format("%d/%m/%Y"))));
    }
    text.extend([
        Line::from(format!("Série: {grade}")),
        Line::from(format!("Comunicação: {}", profile.communication_label())),
        Line::from(""),
        Line::from("Pressione Enter para gerar o plano."),
    ]);
    let body = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Gerar PEI "),
    );
    f.render_widget(body, area);
}

fn render_progress(f: &mut Frame, editor: &PlanEditor, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Gerando PEI personalizado... "),
        )
        .gauge_style(Style::default().fg(Color::Blue))
        .percent(u16::from(editor.progress()));
    f.render_widget(gauge, chunks[0]);

    let lines: Vec<Line> = editor
        .phases()
        .iter()
        .map(|view| {
            let color = match view.status {
                PhaseStatus::Waiting => Color::DarkGray,
                PhaseStatus::InProgress => Color::Yellow,
                PhaseStatus::Complete => Color::Green,
            };
            Line::from(vec![
                Span::raw(format!("{:<24}", view.phase.label)),
                Span::styled(view.status.label(), Style::default().fg(color)),
            ])
        })
        .collect();
    let phases = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Etapas "));
    f.render_widget(phases, chunks[1]);
}

fn render_editing(f: &mut Frame, app: &App, editor: &PlanEditor, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let selected = Section::ALL
        .iter()
        .position(|s| *s == editor.tab())
        .unwrap_or(0);
    let tabs = Tabs::new(Section::ALL.iter().map(|s| s.tab_label()))
        .select(selected)
        .highlight_style(selected_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" PEI: {} ", editor.profile().name)),
        );
    f.render_widget(tabs, chunks[0]);

    let section = editor.tab();
    let mut lines = vec![
        Line::from(heading(section.title())),
        Line::from(Span::styled(
            section.description(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    lines.extend(editor.content().section(section).lines().map(Line::from));

    let title = if app.editing_section {
        " Editando (Esc para sair) "
    } else {
        " Conteúdo "
    };
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(body, chunks[1]);
}

// -- Complete --

fn render_complete(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(heading("PEI Criado com Sucesso")), Line::from("")];
    if let (Some(profile), Some(summary)) = (app.wizard.profile(), app.wizard.plan_summary()) {
        lines.push(Line::from(format!(
            "O plano de {} está pronto.",
            profile.name
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(heading("Resumo do PEI:")));
        lines.push(Line::from(format!("  Acadêmico: {}", summary.academic_highlight)));
        lines.push(Line::from(format!("  Social: {}", summary.social_highlight)));
        lines.push(Line::from(format!(
            "  Comunicação: {}",
            summary.communication_highlight
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Total de metas: {}", summary.total_goals)));
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Concluído "));
    f.render_widget(body, area);
}

// -- Status bar --

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let step_name = match app.wizard.step() {
        Step::Dashboard => "Dashboard",
        Step::Intake => "Novo PEI",
        Step::Generation => "Gerar PEI",
        Step::Complete => "Concluído",
    };

    let hints = match app.wizard.step() {
        Step::Dashboard => "n:novo PEI  q:sair",
        Step::Intake => "↑↓:campo  ←→:opção  espaço:marcar  Enter:continuar",
        Step::Generation => match app.wizard.editor().map(|e| e.view()) {
            Some(EditorView::Prompt) => "Enter:gerar  Esc:voltar",
            Some(EditorView::Progress) => "aguarde...",
            _ if app.editing_section => "Esc:parar de editar",
            _ => "Tab:seção  e:editar  f:finalizar  Esc:voltar",
        },
        Step::Complete => "d:dashboard  n:novo PEI",
    };

    let notification = match &app.last_notification {
        Some(n) => {
            let color = match n.kind {
                NotificationKind::Success => Color::Green,
                NotificationKind::Destructive => Color::Red,
            };
            Span::styled(
                format!("{}: {}", n.title, n.description),
                Style::default().fg(color),
            )
        }
        None => Span::raw(""),
    };

    let bar = Line::from(vec![
        Span::styled(
            format!(" {step_name} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        notification,
        Span::raw("  "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}
