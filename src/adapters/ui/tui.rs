//! Implements InputPort. Inquire-based interactive screens.
//!
//! One loop: settle or wait, render the mounted screen, ask for an action,
//! hand it to the controller.

use crate::adapters::ui::progress;
use crate::domain::{ChatRole, DisplayLanguage, DomainError, Level, Screen};
use crate::ports::InputPort;
use crate::usecases::dashboard::QUICK_ACTIONS;
use crate::usecases::flashcards::{CardFace, FlashcardMode, Practice};
use crate::usecases::{
    AnalyzerPresenter, AppController, ChatPresenter, DashboardPresenter, FlashcardsPresenter,
    MountedScreen,
};
use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Stylize, style};
use crossterm::terminal;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{Confirm, InquireError, Select, Text};
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(80);

/// Sakura theme for every inquire prompt.
pub fn apply_theme() {
    let mut config = RenderConfig::default_colored();
    config.prompt_prefix = Styled::new("❀").with_fg(Color::LightMagenta);
    config.answered_prompt_prefix = Styled::new("✿").with_fg(Color::DarkMagenta);
    config.highlighted_option_prefix = Styled::new("➤").with_fg(Color::LightMagenta);
    config.answer = StyleSheet::new().with_fg(Color::LightCyan);
    config.help_message = StyleSheet::new().with_fg(Color::DarkGrey);
    inquire::set_global_render_config(config);
}

fn ui_err(e: impl fmt::Display) -> DomainError {
    DomainError::Ui(e.to_string())
}

/// Esc and Ctrl-C on a prompt mean "never mind".
fn answered<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(ui_err(e)),
    }
}

/// Main menu: Esc redraws it, Ctrl-C quits.
fn menu_choice(result: Result<Action, InquireError>) -> Result<Option<Action>, DomainError> {
    match result {
        Err(InquireError::OperationInterrupted) => Ok(Some(Action::Quit)),
        other => answered(other),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Open(Screen),
    ChangeLanguage,
    Quit,
    SetTopic,
    SetLevel,
    Generate,
    Flip,
    Next,
    Previous,
    Speak,
    Restart,
    BackToSetup,
    Say,
    NewConversation,
    Analyze,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Open(screen) => write!(f, "Go to {}", screen.title()),
            Action::ChangeLanguage => write!(f, "Change explanation language"),
            Action::Quit => write!(f, "Quit"),
            Action::SetTopic => write!(f, "Set topic"),
            Action::SetLevel => write!(f, "Set level"),
            Action::Generate => write!(f, "Generate cards"),
            Action::Flip => write!(f, "Flip card"),
            Action::Next => write!(f, "Next card"),
            Action::Previous => write!(f, "Previous card"),
            Action::Speak => write!(f, "Listen (ja-JP)"),
            Action::Restart => write!(f, "Restart deck"),
            Action::BackToSetup => write!(f, "New topic"),
            Action::Say => write!(f, "Say something"),
            Action::NewConversation => write!(f, "New conversation"),
            Action::Analyze => write!(f, "Analyze a sentence"),
        }
    }
}

fn actions(app: &AppController) -> Vec<Action> {
    let mut actions = match app.mounted() {
        MountedScreen::Dashboard(_) => QUICK_ACTIONS.iter().map(|s| Action::Open(*s)).collect(),
        MountedScreen::Flashcards(p) => match p.practice() {
            None => vec![Action::SetTopic, Action::SetLevel, Action::Generate],
            Some(practice) => {
                let mut v = vec![Action::Flip];
                if practice.can_next() {
                    v.push(Action::Next);
                }
                if practice.can_previous() {
                    v.push(Action::Previous);
                }
                v.extend([Action::Speak, Action::Restart, Action::BackToSetup]);
                v
            }
        },
        MountedScreen::Chat(_) => vec![Action::Say, Action::NewConversation],
        MountedScreen::Analyzer(_) => vec![Action::Analyze],
    };
    for screen in Screen::ALL {
        if screen != app.screen() && !actions.contains(&Action::Open(screen)) {
            actions.push(Action::Open(screen));
        }
    }
    actions.extend([Action::ChangeLanguage, Action::Quit]);
    actions
}

fn loading_message(screen: Screen) -> &'static str {
    match screen {
        Screen::Dashboard => "Fetching today's phrase... (Esc to keep browsing)",
        Screen::Flashcards => "Generating flashcards... (Esc to keep browsing)",
        Screen::Chat => "Sakura-sensei is typing... (Esc to keep browsing)",
        Screen::Analyzer => "Analyzing... (Esc to keep browsing)",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn render(app: &AppController) {
    println!();
    println!(
        "{} {} {}",
        "❀ Sakura-sensei".magenta().bold(),
        style(format!("· {}", app.screen().title())).bold(),
        style(format!("· {}", app.language())).dark_grey()
    );
    match app.mounted() {
        MountedScreen::Dashboard(p) => render_dashboard(p),
        MountedScreen::Flashcards(p) => render_flashcards(p),
        MountedScreen::Chat(p) => render_chat(p),
        MountedScreen::Analyzer(p) => render_analyzer(p),
    }
    if app.is_loading() {
        println!("  {}", "(still waiting on Sakura-sensei)".dark_grey());
    }
    println!();
}

fn render_dashboard(dashboard: &DashboardPresenter) {
    println!("  {}", "Phrase of the day".underlined());
    match dashboard.phrase() {
        Some(phrase) => {
            println!("  {}", style(&phrase.japanese).magenta().bold());
            println!("  {}", style(&phrase.reading).dark_grey());
            println!("  {}", phrase.translation);
            println!("  {}", style(&phrase.context).italic());
        }
        None => println!("  {}", "Loading...".dark_grey()),
    }
}

fn render_flashcards(flashcards: &FlashcardsPresenter) {
    match flashcards.mode() {
        FlashcardMode::Setup { .. } => {
            let topic = if flashcards.topic().trim().is_empty() {
                "(none, e.g. Food, Travel, Anime)"
            } else {
                flashcards.topic()
            };
            println!("  Topic: {}", style(topic).cyan());
            println!("  Level: {}", style(flashcards.level()).cyan());
        }
        FlashcardMode::Practice(practice) => render_card(practice),
    }
}

fn render_card(practice: &Practice) {
    let (position, total) = practice.position();
    let card = practice.current();
    println!("  Card {} / {}", position, total);
    match practice.face() {
        CardFace::Front => {
            println!("  {}", style(&card.kanji).magenta().bold());
            println!("  {}", "(flip to reveal)".dark_grey());
        }
        CardFace::Back => {
            println!("  {}  {}", style(&card.reading).bold(), style(&card.romaji).dark_grey());
            println!("  {}", style(&card.translation).cyan());
            println!("  {}", style(&card.example_sentence).italic());
        }
    }
}

fn render_chat(chat: &ChatPresenter) {
    for message in chat.transcript() {
        match message.role {
            ChatRole::Model => println!("  {} {}", "Sakura-sensei:".magenta().bold(), message.text),
            ChatRole::User => println!("  {} {}", "You:".cyan().bold(), message.text),
        }
    }
}

fn render_analyzer(analyzer: &AnalyzerPresenter) {
    if let Some(banner) = analyzer.error() {
        println!("  {}", style(banner).red().bold());
    }
    let Some(result) = analyzer.result() else {
        if analyzer.input().is_empty() {
            println!("  {}", "Paste a Japanese sentence to break it down.".dark_grey());
        }
        return;
    };
    println!("  {}", style(&result.original).magenta().bold());
    println!("  {}", result.translation);
    for token in &result.tokens {
        println!(
            "    {} {} {} {}",
            style(&token.word).bold(),
            style(format!("({})", token.reading)).dark_grey(),
            style(format!("[{}]", token.part_of_speech)).cyan(),
            token.meaning
        );
    }
    if !result.grammar_notes.is_empty() {
        println!("  {}", style(&result.grammar_notes).italic());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Waiting
// ─────────────────────────────────────────────────────────────────────────────

fn escape_pressed() -> Result<bool, DomainError> {
    while event::poll(Duration::ZERO).map_err(ui_err)? {
        if let Event::Key(key) = event::read().map_err(ui_err)? {
            if key.kind == KeyEventKind::Press && key.code == KeyCode::Esc {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Spin until the mounted screen settles. Returns false if the user pressed
/// Esc first; the request then stays outstanding.
async fn wait_while_loading(app: &mut AppController) -> Result<bool, DomainError> {
    let spinner = progress::spinner(loading_message(app.screen()));
    terminal::enable_raw_mode().map_err(ui_err)?;
    let outcome = async {
        while app.is_loading() {
            if escape_pressed()? {
                debug!(screen = %app.screen(), "stopped waiting");
                return Ok(false);
            }
            match tokio::time::timeout(POLL_INTERVAL, app.next_completion()).await {
                Ok(Some(completion)) => {
                    app.apply(completion);
                }
                Ok(None) => break,
                Err(_) => {}
            }
        }
        Ok::<bool, DomainError>(true)
    }
    .await;
    let restored = terminal::disable_raw_mode().map_err(ui_err);
    spinner.finish_and_clear();
    restored?;
    outcome
}

fn acknowledge(alert: &str) -> Result<(), DomainError> {
    println!("  {}", style(alert).red().bold());
    answered(
        Confirm::new("OK?")
            .with_default(true)
            .with_help_message("Press Enter to continue")
            .prompt(),
    )?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Adapter
// ─────────────────────────────────────────────────────────────────────────────

/// TUI adapter. Inquire prompts over the view controller.
pub struct TuiInputPort {
    app: Mutex<AppController>,
}

impl TuiInputPort {
    pub fn new(app: AppController) -> Self {
        Self {
            app: Mutex::new(app),
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let mut app = self.app.lock().await;
        let mut keep_waiting = true;
        loop {
            app.drain_completions();
            if keep_waiting && app.is_loading() {
                keep_waiting = wait_while_loading(&mut app).await?;
            }
            if let Some(alert) = app.take_flashcard_alert() {
                acknowledge(&alert)?;
            }

            render(&app);
            let choices = actions(&app);
            let Some(action) = menu_choice(Select::new("What next?", choices).prompt())? else {
                continue;
            };
            keep_waiting = true;

            match action {
                Action::Quit => {
                    info!("user quit");
                    return Ok(());
                }
                Action::Open(screen) => app.navigate(screen),
                Action::ChangeLanguage => {
                    let current = DisplayLanguage::ALL
                        .iter()
                        .position(|l| *l == app.language())
                        .unwrap_or(0);
                    let prompt = Select::new("Explain things in:", DisplayLanguage::ALL.to_vec())
                        .with_starting_cursor(current)
                        .prompt();
                    if let Some(language) = answered(prompt)? {
                        app.set_language(language);
                    }
                }
                Action::SetTopic => {
                    let initial = app.flashcards().map(|p| p.topic().to_string()).unwrap_or_default();
                    let prompt = Text::new("Topic:")
                        .with_initial_value(&initial)
                        .with_placeholder("e.g. Food, Travel, Anime")
                        .prompt();
                    if let Some(topic) = answered(prompt)? {
                        app.set_flashcard_topic(&topic);
                    }
                }
                Action::SetLevel => {
                    let prompt = Select::new("Level:", Level::ALL.to_vec()).prompt();
                    if let Some(level) = answered(prompt)? {
                        app.set_flashcard_level(level);
                    }
                }
                Action::Generate => {
                    if !app.generate_flashcards() {
                        println!("  {}", "Enter a topic first.".yellow());
                    }
                }
                Action::Flip => {
                    app.flip_card();
                }
                Action::Next => {
                    app.step_card(true).await;
                }
                Action::Previous => {
                    app.step_card(false).await;
                }
                Action::Speak => {
                    app.speak_current_card();
                }
                Action::Restart => app.restart_deck(),
                Action::BackToSetup => app.back_to_setup(),
                Action::Say => {
                    let prompt = Text::new("You:")
                        .with_placeholder("Type in Japanese or your language")
                        .prompt();
                    if let Some(text) = answered(prompt)? {
                        app.send_chat(&text);
                    }
                }
                Action::NewConversation => app.reset_chat(),
                Action::Analyze => {
                    let initial = app.analyzer().map(|p| p.input().to_string()).unwrap_or_default();
                    let prompt = Text::new("Japanese sentence:")
                        .with_initial_value(&initial)
                        .with_placeholder("e.g. 私は学生です")
                        .prompt();
                    if let Some(sentence) = answered(prompt)? {
                        app.analyze(&sentence);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAiAdapter;
    use crate::adapters::speech::SilentSpeech;
    use crate::ports::{GenerativePort, SpeechPort};
    use crate::usecases::TutorService;
    use std::sync::Arc;

    fn controller() -> AppController {
        let ai: Arc<dyn GenerativePort> = Arc::new(MockAiAdapter::with_delay(1));
        let speech: Arc<dyn SpeechPort> = Arc::new(SilentSpeech);
        AppController::new(Arc::new(TutorService::new(ai)), speech)
    }

    #[tokio::test]
    async fn test_menu_offers_every_other_screen_and_quit() {
        let mut app = controller();
        for screen in Screen::ALL {
            app.navigate(screen);
            let menu = actions(&app);
            assert!(!menu.contains(&Action::Open(screen)));
            assert_eq!(menu.iter().filter(|a| matches!(a, Action::Open(_))).count(), 3);
            assert_eq!(menu.last(), Some(&Action::Quit));
        }
    }

    #[tokio::test]
    async fn test_practice_menu_hides_blocked_moves() {
        let mut app = controller();
        app.navigate(Screen::Flashcards);
        app.set_flashcard_topic("Food");
        app.generate_flashcards();
        app.settle().await;

        let menu = actions(&app);
        assert!(menu.contains(&Action::Next));
        assert!(!menu.contains(&Action::Previous));
        assert!(menu.contains(&Action::Speak));
    }

    #[test]
    fn test_ctrl_c_on_main_menu_quits() {
        assert_eq!(
            menu_choice(Err(InquireError::OperationInterrupted)).unwrap(),
            Some(Action::Quit)
        );
        assert_eq!(menu_choice(Err(InquireError::OperationCanceled)).unwrap(), None);
        assert_eq!(
            menu_choice(Ok(Action::Flip)).unwrap(),
            Some(Action::Flip)
        );
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::Open(Screen::Chat).to_string(), "Go to Chat Tutor");
        assert_eq!(Action::Quit.to_string(), "Quit");
    }
}
