use std::io;
use strum::IntoEnumIterator;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    widgets::{ListState, TableState},
};

use crate::{
    app::{Portfolio, ui},
    models::{ApiProvider, GrowthPeriod},
};

pub struct App {
    portfolio: Portfolio,
    import_path: Option<String>,
    table_state: TableState,
    popup_message: Option<String>,
    error_popup: Option<String>,
    show_api_popup: bool,
    default_api_state: ListState,
    selection_mode: bool,
}

impl App {
    pub fn new(portfolio: Portfolio, import_path: Option<String>) -> Self {
        let mut default_api_state = ListState::default();
        default_api_state.select(Some(0));
        Self {
            portfolio,
            import_path,
            table_state: TableState::default(),
            popup_message: None,
            error_popup: None,
            show_api_popup: false,
            default_api_state,
            selection_mode: false,
        }
    }

    fn show_popup(&mut self, message: &str) {
        self.popup_message = Some(message.to_string());
    }

    fn clear_popup(&mut self) {
        self.popup_message = None;
    }

    fn show_error_popup(&mut self, message: &str) {
        self.error_popup = Some(message.to_string());
    }

    fn clear_error_popup(&mut self) {
        self.error_popup = None;
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|frame| {
            ui::render(
                frame,
                &self.portfolio,
                &mut self.table_state,
                &self.popup_message,
                &self.error_popup,
                self.show_api_popup,
                &mut self.default_api_state,
                self.selection_mode,
            )
        })?;
        Ok(())
    }

    async fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.draw(terminal)?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if self.show_api_popup {
                    self.selection_mode = false;
                    self.table_state.select(None);
                    match key.code {
                        KeyCode::Esc => self.show_api_popup = false,
                        KeyCode::Down => {
                            let i = match self.default_api_state.selected() {
                                Some(i) => {
                                    if i >= ApiProvider::iter().len() - 1 {
                                        0
                                    } else {
                                        i + 1
                                    }
                                }
                                None => 0,
                            };
                            self.default_api_state.select(Some(i));
                        }
                        KeyCode::Up => {
                            let i = match self.default_api_state.selected() {
                                Some(i) => {
                                    if i == 0 {
                                        ApiProvider::iter().len() - 1
                                    } else {
                                        i - 1
                                    }
                                }
                                None => 0,
                            };
                            self.default_api_state.select(Some(i));
                        }
                        KeyCode::Enter => {
                            if let Some(i) = self.default_api_state.selected() {
                                self.portfolio.set_default_api(
                                    ApiProvider::iter()
                                        .nth(i)
                                        .with_context(|| "Cannot select")?,
                                );
                                self.show_api_popup = false;
                            }
                        }
                        _ => {}
                    }
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Enter | KeyCode::Esc => {
                        if self.error_popup.is_some() {
                            self.clear_error_popup();
                            continue;
                        }
                        if key.code == KeyCode::Esc {
                            self.selection_mode = false;
                            self.table_state.select(None);
                        }
                    }
                    KeyCode::F(4) => {
                        self.selection_mode = false;
                        self.table_state.select(None);

                        let Some(path) = self.import_path.clone() else {
                            self.show_error_popup("No import file configured (--import)");
                            continue;
                        };

                        self.show_popup("Importing trades...");
                        self.draw(terminal)?;

                        let import_result = self.portfolio.import_trades(&path).await;
                        let refresh_result = self.portfolio.refresh().await;

                        self.clear_popup();
                        self.draw(terminal)?;

                        if let Err(e) = import_result {
                            self.show_error_popup(&format!("Error importing trades: {:?}", e));
                        } else if let Err(e) = refresh_result {
                            self.show_error_popup(&format!("Error refreshing portfolio: {:?}", e));
                        }
                    }
                    KeyCode::F(5) => {
                        self.selection_mode = false;
                        self.table_state.select(None);
                        self.show_popup("Refreshing quotes...");
                        self.draw(terminal)?;

                        let refresh_result = self.portfolio.refresh().await;

                        self.clear_popup();
                        self.draw(terminal)?;

                        if let Err(e) = refresh_result {
                            self.show_error_popup(&format!("Error refreshing portfolio: {:?}", e));
                        }
                    }
                    KeyCode::F(8) => {
                        self.selection_mode = false;
                        self.show_api_popup = true;
                    }
                    KeyCode::Tab => {
                        if let Err(e) = self.cycle_period(1).await {
                            self.show_error_popup(&format!("Error reloading growth: {:?}", e));
                        }
                    }
                    KeyCode::BackTab => {
                        if let Err(e) = self.cycle_period(-1).await {
                            self.show_error_popup(&format!("Error reloading growth: {:?}", e));
                        }
                    }
                    KeyCode::Down => {
                        if !self.show_api_popup {
                            self.selection_mode = true;
                        }
                        let positions = self.portfolio.positions();
                        if !positions.is_empty() {
                            let i = match self.table_state.selected() {
                                Some(i) => {
                                    if i >= positions.len() - 1 {
                                        0
                                    } else {
                                        i + 1
                                    }
                                }
                                None => 0,
                            };
                            self.table_state.select(Some(i));
                        }
                    }
                    KeyCode::Up => {
                        if !self.show_api_popup {
                            self.selection_mode = true;
                        }
                        let positions = self.portfolio.positions();
                        if !positions.is_empty() {
                            let i = match self.table_state.selected() {
                                Some(i) => {
                                    if i == 0 {
                                        positions.len() - 1
                                    } else {
                                        i - 1
                                    }
                                }
                                None => 0,
                            };
                            self.table_state.select(Some(i));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    async fn cycle_period(&mut self, step: i64) -> Result<()> {
        let periods: Vec<GrowthPeriod> = GrowthPeriod::iter().collect();
        let current = periods
            .iter()
            .position(|p| *p == self.portfolio.period())
            .unwrap_or(0) as i64;
        let len = periods.len() as i64;
        let next = (current + step).rem_euclid(len);
        self.portfolio.set_period(periods[next as usize]).await
    }
}
