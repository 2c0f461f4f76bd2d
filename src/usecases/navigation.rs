//! View controller. Owns the current screen, the display language and the
//! mounted screen presenter, and routes finished remote requests back to it.
//!
//! Remote calls run as spawned tasks and report over an mpsc channel. Each
//! completion is tagged with the mount it was issued from and its ticket, so
//! results for an unmounted screen or a superseded request are dropped.

use crate::domain::{
    AnalysisResult, DailyPhrase, DisplayLanguage, DomainError, Flashcard, Level, Screen,
};
use crate::ports::{ChatSessionPort, JAPANESE_LOCALE, SpeechPort};
use crate::usecases::analyzer::AnalyzerPresenter;
use crate::usecases::chat::ChatPresenter;
use crate::usecases::dashboard::DashboardPresenter;
use crate::usecases::flashcards::{CardFace, FLIP_RESET_DELAY, FlashcardsPresenter};
use crate::usecases::ticket::{Ticket, TicketCounter};
use crate::usecases::tutor_service::TutorService;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The presenter of the active screen. Its state lives only while mounted.
pub enum MountedScreen {
    Dashboard(DashboardPresenter),
    Flashcards(FlashcardsPresenter),
    Chat(ChatPresenter),
    Analyzer(AnalyzerPresenter),
}

impl MountedScreen {
    pub fn screen(&self) -> Screen {
        match self {
            MountedScreen::Dashboard(_) => Screen::Dashboard,
            MountedScreen::Flashcards(_) => Screen::Flashcards,
            MountedScreen::Chat(_) => Screen::Chat,
            MountedScreen::Analyzer(_) => Screen::Analyzer,
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            MountedScreen::Dashboard(p) => p.is_loading(),
            MountedScreen::Flashcards(p) => p.is_loading(),
            MountedScreen::Chat(p) => p.is_awaiting_reply(),
            MountedScreen::Analyzer(p) => p.is_loading(),
        }
    }
}

/// Result of a remote request, as delivered back to the controller.
pub enum Outcome {
    DailyPhrase(DailyPhrase),
    Flashcards(Result<Vec<Flashcard>, DomainError>),
    Analysis(Result<AnalysisResult, DomainError>),
    ChatReply {
        session: Box<dyn ChatSessionPort>,
        reply: Result<String, DomainError>,
    },
}

pub struct Completion {
    mount: u64,
    ticket: Ticket,
    outcome: Outcome,
}

/// Process-wide UI state: screen, language, and the mounted presenter.
pub struct AppController {
    tutor: Arc<TutorService>,
    speech: Arc<dyn SpeechPort>,
    screen: Screen,
    language: DisplayLanguage,
    mounted: MountedScreen,
    mount: u64,
    tickets: TicketCounter,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl AppController {
    /// Start on the Dashboard in English and request the first phrase.
    /// Must be called inside a tokio runtime.
    pub fn new(tutor: Arc<TutorService>, speech: Arc<dyn SpeechPort>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = Self {
            tutor,
            speech,
            screen: Screen::Dashboard,
            language: DisplayLanguage::default(),
            mounted: MountedScreen::Dashboard(DashboardPresenter::new()),
            mount: 0,
            tickets: TicketCounter::default(),
            tx,
            rx,
        };
        app.mount(Screen::Dashboard);
        app
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn language(&self) -> DisplayLanguage {
        self.language
    }

    pub fn mounted(&self) -> &MountedScreen {
        &self.mounted
    }

    /// Whether the active screen is waiting on a remote request.
    pub fn is_loading(&self) -> bool {
        self.mounted.is_loading()
    }

    pub fn dashboard(&self) -> Option<&DashboardPresenter> {
        match &self.mounted {
            MountedScreen::Dashboard(p) => Some(p),
            _ => None,
        }
    }

    pub fn flashcards(&self) -> Option<&FlashcardsPresenter> {
        match &self.mounted {
            MountedScreen::Flashcards(p) => Some(p),
            _ => None,
        }
    }

    pub fn chat(&self) -> Option<&ChatPresenter> {
        match &self.mounted {
            MountedScreen::Chat(p) => Some(p),
            _ => None,
        }
    }

    pub fn analyzer(&self) -> Option<&AnalyzerPresenter> {
        match &self.mounted {
            MountedScreen::Analyzer(p) => Some(p),
            _ => None,
        }
    }

    fn flashcards_mut(&mut self) -> Option<&mut FlashcardsPresenter> {
        match &mut self.mounted {
            MountedScreen::Flashcards(p) => Some(p),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Show `screen`. Any screen is always allowed. Switching screens unmounts
    /// the current presenter and abandons its outstanding request.
    pub fn navigate(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        info!(from = %self.screen, to = %screen, "navigate");
        self.screen = screen;
        self.mount(screen);
    }

    /// Change the display language and reset language-derived screen state.
    pub fn set_language(&mut self, language: DisplayLanguage) {
        if language == self.language {
            return;
        }
        info!(from = %self.language, to = %language, "display language changed");
        self.language = language;

        match self.mounted.screen() {
            Screen::Dashboard => self.fetch_daily_phrase(),
            Screen::Chat => self.reset_chat(),
            Screen::Flashcards | Screen::Analyzer => {}
        }
    }

    fn mount(&mut self, screen: Screen) {
        self.mount += 1;
        self.mounted = match screen {
            Screen::Dashboard => MountedScreen::Dashboard(DashboardPresenter::new()),
            Screen::Flashcards => MountedScreen::Flashcards(FlashcardsPresenter::new()),
            Screen::Chat => {
                MountedScreen::Chat(ChatPresenter::new(self.tutor.start_chat(self.language)))
            }
            Screen::Analyzer => MountedScreen::Analyzer(AnalyzerPresenter::new()),
        };
        debug!(mount = self.mount, %screen, "mounted screen");
        if screen == Screen::Dashboard {
            self.fetch_daily_phrase();
        }
    }

    fn spawn<F>(&self, ticket: Ticket, work: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let tx = self.tx.clone();
        let mount = self.mount;
        tokio::spawn(async move {
            let outcome = work.await;
            if tx
                .send(Completion {
                    mount,
                    ticket,
                    outcome,
                })
                .is_err()
            {
                debug!(%ticket, "controller gone; dropping completion");
            }
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Screen actions
    // ─────────────────────────────────────────────────────────────────────────

    fn fetch_daily_phrase(&mut self) {
        let MountedScreen::Dashboard(dashboard) = &mut self.mounted else {
            return;
        };
        let ticket = self.tickets.issue();
        dashboard.begin_fetch(ticket);
        let tutor = Arc::clone(&self.tutor);
        let language = self.language;
        self.spawn(ticket, async move {
            Outcome::DailyPhrase(tutor.daily_phrase(language).await)
        });
    }

    pub fn set_flashcard_topic(&mut self, topic: &str) {
        if let Some(p) = self.flashcards_mut() {
            p.set_topic(topic);
        }
    }

    pub fn set_flashcard_level(&mut self, level: Level) {
        if let Some(p) = self.flashcards_mut() {
            p.set_level(level);
        }
    }

    /// Request a new deck. Returns false if nothing was sent.
    pub fn generate_flashcards(&mut self) -> bool {
        let ticket = self.tickets.issue();
        let Some(job) = self.flashcards_mut().and_then(|p| p.begin_generate(ticket)) else {
            return false;
        };
        let tutor = Arc::clone(&self.tutor);
        let language = self.language;
        self.spawn(ticket, async move {
            Outcome::Flashcards(
                tutor
                    .generate_flashcards(&job.topic, job.level, language)
                    .await,
            )
        });
        true
    }

    pub fn flip_card(&mut self) -> bool {
        self.flashcards_mut()
            .and_then(|p| p.practice_mut())
            .map(|practice| practice.flip())
            .is_some()
    }

    pub fn next_card(&mut self) -> bool {
        self.flashcards_mut()
            .and_then(|p| p.practice_mut())
            .is_some_and(|practice| practice.next())
    }

    pub fn previous_card(&mut self) -> bool {
        self.flashcards_mut()
            .and_then(|p| p.practice_mut())
            .is_some_and(|practice| practice.previous())
    }

    /// Move one card forward (or back). A card showing its back is turned
    /// face-up first and the move lands after `FLIP_RESET_DELAY`.
    /// Returns false at either end of the deck.
    pub async fn step_card(&mut self, forward: bool) -> bool {
        let Some(practice) = self.flashcards().and_then(|p| p.practice()) else {
            return false;
        };
        let can_move = if forward {
            practice.can_next()
        } else {
            practice.can_previous()
        };
        if !can_move {
            return false;
        }
        if practice.face() == CardFace::Back {
            self.flip_card();
            tokio::time::sleep(FLIP_RESET_DELAY).await;
        }
        if forward {
            self.next_card()
        } else {
            self.previous_card()
        }
    }

    pub fn restart_deck(&mut self) {
        if let Some(practice) = self.flashcards_mut().and_then(|p| p.practice_mut()) {
            practice.restart();
        }
    }

    pub fn back_to_setup(&mut self) {
        if let Some(p) = self.flashcards_mut() {
            p.back_to_setup();
        }
    }

    /// Pop the blocking alert raised by a failed generation, if any.
    pub fn take_flashcard_alert(&mut self) -> Option<String> {
        self.flashcards_mut().and_then(|p| p.take_alert())
    }

    /// Read the current card aloud. Fire-and-forget.
    pub fn speak_current_card(&self) -> bool {
        let Some(card) = self
            .flashcards()
            .and_then(|p| p.practice())
            .map(|practice| practice.current())
        else {
            return false;
        };
        self.speech.speak(&card.kanji, JAPANESE_LOCALE);
        true
    }

    /// Send a chat message. Returns false for blank text, off-screen, or while a reply is pending.
    pub fn send_chat(&mut self, text: &str) -> bool {
        let ticket = self.tickets.issue();
        let MountedScreen::Chat(chat) = &mut self.mounted else {
            return false;
        };
        let Some((mut session, turn)) = chat.submit(text, ticket) else {
            return false;
        };
        self.spawn(ticket, async move {
            let reply = TutorService::send_chat(session.as_mut(), &turn).await;
            Outcome::ChatReply { session, reply }
        });
        true
    }

    /// Discard the session and transcript and start a fresh conversation.
    pub fn reset_chat(&mut self) {
        let language = self.language;
        if let MountedScreen::Chat(chat) = &mut self.mounted {
            chat.reset(self.tutor.start_chat(language));
        }
    }

    /// Analyze `input`. Blank input issues no request and changes nothing.
    pub fn analyze(&mut self, input: &str) -> bool {
        let ticket = self.tickets.issue();
        let MountedScreen::Analyzer(analyzer) = &mut self.mounted else {
            return false;
        };
        let Some(sentence) = analyzer.submit(input, ticket) else {
            return false;
        };
        let tutor = Arc::clone(&self.tutor);
        let language = self.language;
        self.spawn(ticket, async move {
            Outcome::Analysis(tutor.analyze_sentence(&sentence, language).await)
        });
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Completions
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply one completion. Returns false if it was stale and ignored.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let Completion {
            mount,
            ticket,
            outcome,
        } = completion;
        if mount != self.mount {
            debug!(%ticket, mount, current = self.mount, "dropping completion for unmounted screen");
            return false;
        }
        match (&mut self.mounted, outcome) {
            (MountedScreen::Dashboard(p), Outcome::DailyPhrase(phrase)) => {
                p.complete_fetch(ticket, phrase)
            }
            (MountedScreen::Flashcards(p), Outcome::Flashcards(result)) => {
                p.complete_generate(ticket, result)
            }
            (MountedScreen::Chat(p), Outcome::ChatReply { session, reply }) => {
                p.complete(ticket, session, reply)
            }
            (MountedScreen::Analyzer(p), Outcome::Analysis(result)) => p.complete(ticket, result),
            _ => {
                debug!(%ticket, "completion does not match mounted screen");
                false
            }
        }
    }

    /// Apply every completion that has already arrived, without waiting.
    /// Returns how many changed state.
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next completion from any request, current or abandoned.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }

    /// Wait until the active screen has no outstanding request.
    pub async fn settle(&mut self) {
        while self.is_loading() {
            match self.rx.recv().await {
                Some(completion) => {
                    self.apply(completion);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAiAdapter;
    use crate::domain::{ChatRole, FLASHCARDS_PER_DECK, Intent};
    use crate::ports::GenerativePort;
    use crate::usecases::analyzer::ANALYSIS_FAILED_BANNER;
    use crate::usecases::chat::CHAT_APOLOGY;
    use crate::usecases::flashcards::{FlashcardMode, GENERATION_FAILED_ALERT};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSpeech {
        spoken: Mutex<Vec<(String, String)>>,
    }

    impl SpeechPort for RecordingSpeech {
        fn speak(&self, text: &str, locale: &str) {
            self.spoken
                .lock()
                .unwrap()
                .push((text.to_string(), locale.to_string()));
        }
    }

    struct Harness {
        app: AppController,
        ai: Arc<MockAiAdapter>,
        speech: Arc<RecordingSpeech>,
    }

    fn harness(ai: MockAiAdapter) -> Harness {
        let ai = Arc::new(ai);
        let speech = Arc::new(RecordingSpeech::default());
        let tutor = Arc::new(TutorService::new(Arc::clone(&ai) as Arc<dyn GenerativePort>));
        let app = AppController::new(tutor, Arc::clone(&speech) as Arc<dyn SpeechPort>);
        Harness { app, ai, speech }
    }

    #[tokio::test]
    async fn test_fresh_start_is_dashboard_english_with_phrase() {
        let mut h = harness(MockAiAdapter::with_delay(1));
        assert_eq!(h.app.screen(), Screen::Dashboard);
        assert_eq!(h.app.language(), DisplayLanguage::English);
        assert!(h.app.is_loading());

        h.app.settle().await;
        let phrase = h.app.dashboard().unwrap().phrase().unwrap();
        assert_eq!(phrase.japanese, "いただきます");
        assert_eq!(h.ai.log().requests.len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_refetches_on_language_change() {
        let mut h = harness(MockAiAdapter::with_delay(1));
        h.app.settle().await;
        h.app.set_language(DisplayLanguage::Malay);
        assert!(h.app.is_loading());
        h.app.settle().await;

        // Same language again is a no-op.
        h.app.set_language(DisplayLanguage::Malay);
        assert!(!h.app.is_loading());

        let log = h.ai.log();
        assert_eq!(log.requests.len(), 2);
        assert_eq!(log.requests[1].language, DisplayLanguage::Malay);
    }

    #[tokio::test]
    async fn test_daily_phrase_failure_yields_fallback_in_every_language() {
        let mut h = harness(MockAiAdapter::failing(1));
        h.app.settle().await;
        assert_eq!(
            h.app.dashboard().unwrap().phrase(),
            Some(&DailyPhrase::fallback())
        );
        for lang in [DisplayLanguage::ChineseSimplified, DisplayLanguage::Malay] {
            h.app.set_language(lang);
            h.app.settle().await;
            assert_eq!(
                h.app.dashboard().unwrap().phrase(),
                Some(&DailyPhrase::fallback())
            );
        }
    }

    #[tokio::test]
    async fn test_navigate_accepts_every_screen() {
        let mut h = harness(MockAiAdapter::with_delay(1));
        for screen in Screen::ALL {
            h.app.navigate(screen);
            assert_eq!(h.app.screen(), screen);
            assert_eq!(h.app.mounted().screen(), screen);
        }
    }

    #[tokio::test]
    async fn test_flashcard_scenario_and_clamped_navigation() {
        let mut h = harness(MockAiAdapter::with_delay(1));
        h.app.navigate(Screen::Flashcards);
        h.app.set_flashcard_topic("Food");
        h.app.set_flashcard_level(Level::Beginner);
        assert!(h.app.generate_flashcards());
        assert!(!h.app.generate_flashcards());
        h.app.settle().await;

        let practice = h.app.flashcards().unwrap().practice().unwrap();
        assert_eq!(practice.deck().len(), FLASHCARDS_PER_DECK);
        for card in practice.deck().cards() {
            assert!(!card.kanji.is_empty() && !card.example_sentence.is_empty());
        }

        assert!(!h.app.previous_card());
        for _ in 0..FLASHCARDS_PER_DECK + 3 {
            h.app.next_card();
        }
        let practice = h.app.flashcards().unwrap().practice().unwrap();
        assert_eq!(practice.index(), FLASHCARDS_PER_DECK - 1);

        assert!(h.app.flip_card());
        assert_eq!(
            h.app.flashcards().unwrap().practice().unwrap().face(),
            CardFace::Back
        );
        h.app.restart_deck();
        let practice = h.app.flashcards().unwrap().practice().unwrap();
        assert_eq!((practice.index(), practice.face()), (0, CardFace::Front));

        let request = h
            .ai
            .log()
            .requests
            .iter()
            .find(|r| r.intent == Intent::FlashcardSet)
            .cloned()
            .unwrap();
        assert!(request.prompt.contains("\"Food\""));
        assert!(request.prompt.contains("Beginner"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_from_back_face_resets_then_moves_after_delay() {
        let mut h = harness(MockAiAdapter::with_delay(1));
        h.app.navigate(Screen::Flashcards);
        h.app.set_flashcard_topic("Food");
        h.app.generate_flashcards();
        h.app.settle().await;
        h.app.flip_card();

        // Cut the step short inside the delay: face is down, card unchanged.
        let early = FLIP_RESET_DELAY - Duration::from_millis(1);
        assert!(
            tokio::time::timeout(early, h.app.step_card(true))
                .await
                .is_err()
        );
        let practice = h.app.flashcards().unwrap().practice().unwrap();
        assert_eq!((practice.index(), practice.face()), (0, CardFace::Front));

        // Full step from the back face waits out the delay, then moves.
        h.app.flip_card();
        let started = tokio::time::Instant::now();
        assert!(h.app.step_card(true).await);
        assert!(started.elapsed() >= FLIP_RESET_DELAY);
        let practice = h.app.flashcards().unwrap().practice().unwrap();
        assert_eq!((practice.index(), practice.face()), (1, CardFace::Front));

        // Face-up moves are immediate; blocked moves change nothing.
        let started = tokio::time::Instant::now();
        assert!(h.app.step_card(false).await);
        assert!(started.elapsed() < FLIP_RESET_DELAY);
        h.app.flip_card();
        assert!(!h.app.step_card(false).await);
        let practice = h.app.flashcards().unwrap().practice().unwrap();
        assert_eq!((practice.index(), practice.face()), (0, CardFace::Back));
    }

    #[tokio::test]
    async fn test_flashcard_failure_raises_alert_and_stays_in_setup() {
        let mut h = harness(MockAiAdapter::failing(1));
        h.app.navigate(Screen::Flashcards);
        h.app.set_flashcard_topic("Food");
        h.app.generate_flashcards();
        h.app.settle().await;

        assert_eq!(
            h.app.flashcards().unwrap().mode(),
            &FlashcardMode::Setup { generating: None }
        );
        assert_eq!(
            h.app.take_flashcard_alert().as_deref(),
            Some(GENERATION_FAILED_ALERT)
        );
    }

    #[tokio::test]
    async fn test_speak_current_card_in_japanese() {
        let mut h = harness(MockAiAdapter::with_delay(1));
        assert!(!h.app.speak_current_card());
        h.app.navigate(Screen::Flashcards);
        h.app.set_flashcard_topic("Food");
        h.app.generate_flashcards();
        h.app.settle().await;

        assert!(h.app.speak_current_card());
        let spoken = h.speech.spoken.lock().unwrap();
        assert_eq!(spoken.as_slice(), [("寿司".to_string(), "ja-JP".to_string())]);
    }

    #[tokio::test]
    async fn test_language_switch_on_chat_resets_transcript() {
        let mut h = harness(MockAiAdapter::with_delay(1));
        h.app.navigate(Screen::Chat);
        assert!(h.app.send_chat("こんにちは"));
        h.app.settle().await;
        assert_eq!(h.app.chat().unwrap().transcript().len(), 3);

        for lang in [
            DisplayLanguage::Malay,
            DisplayLanguage::ChineseSimplified,
            DisplayLanguage::English,
        ] {
            h.app.set_language(lang);
            let transcript = h.app.chat().unwrap().transcript();
            assert_eq!(transcript.len(), 1);
            assert_eq!(transcript[0].role, ChatRole::Model);
            assert!(transcript[0].text.contains(lang.display_name()));
        }

        // One session per mount plus one per language switch.
        assert_eq!(
            h.ai.log().sessions,
            vec![
                DisplayLanguage::English,
                DisplayLanguage::Malay,
                DisplayLanguage::ChineseSimplified,
                DisplayLanguage::English,
            ]
        );
    }

    #[tokio::test]
    async fn test_language_switch_discards_in_flight_reply() {
        let mut h = harness(MockAiAdapter::with_delay(30));
        h.app.navigate(Screen::Chat);
        assert!(h.app.send_chat("こんにちは"));
        assert!(!h.app.send_chat("もしもし"));
        h.app.set_language(DisplayLanguage::Malay);

        let late = h.app.next_completion().await.unwrap();
        assert!(!h.app.apply(late));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(h.app.drain_completions(), 0);

        let chat = h.app.chat().unwrap();
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(chat.language(), DisplayLanguage::Malay);
        assert!(!chat.is_awaiting_reply());
        assert!(h.app.send_chat("おはよう"));
    }

    #[tokio::test]
    async fn test_chat_failure_appends_apology() {
        let mut h = harness(MockAiAdapter::failing(1));
        h.app.navigate(Screen::Chat);
        h.app.send_chat("hello");
        h.app.settle().await;
        let last = h.app.chat().unwrap().transcript().last().cloned().unwrap();
        assert_eq!(last.text, CHAT_APOLOGY);
        assert!(h.app.send_chat("again"));
    }

    #[tokio::test]
    async fn test_analyzer_scenario_and_blank_input() {
        let mut h = harness(MockAiAdapter::with_delay(1));
        h.app.settle().await;
        h.app.navigate(Screen::Analyzer);
        let before = h.ai.log().requests.len();

        assert!(!h.app.analyze("   \n "));
        assert!(!h.app.is_loading());
        assert!(h.app.analyzer().unwrap().result().is_none());
        assert_eq!(h.ai.log().requests.len(), before);

        assert!(h.app.analyze("私は学生です"));
        h.app.settle().await;
        let result = h.app.analyzer().unwrap().result().unwrap();
        assert!(!result.translation.is_empty());
        assert!(!result.tokens.is_empty());
    }

    #[tokio::test]
    async fn test_analyzer_failure_shows_banner_and_keeps_input() {
        let mut h = harness(MockAiAdapter::failing(1));
        h.app.navigate(Screen::Analyzer);
        h.app.analyze("私は学生です");
        h.app.settle().await;
        let analyzer = h.app.analyzer().unwrap();
        assert_eq!(analyzer.error(), Some(ANALYSIS_FAILED_BANNER));
        assert!(analyzer.result().is_none());
        assert_eq!(analyzer.input(), "私は学生です");
    }

    #[tokio::test]
    async fn test_navigating_away_abandons_request() {
        let mut h = harness(MockAiAdapter::with_delay(20));
        h.app.navigate(Screen::Analyzer);
        assert!(h.app.analyze("私は学生です"));
        h.app.navigate(Screen::Flashcards);
        h.app.navigate(Screen::Analyzer);
        assert!(!h.app.is_loading());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(h.app.drain_completions(), 0);
        assert!(h.app.analyzer().unwrap().result().is_none());
    }

    #[tokio::test]
    async fn test_dropping_controller_with_request_in_flight() {
        let h = harness(MockAiAdapter::with_delay(10));
        drop(h.app);
        tokio::time::sleep(Duration::from_millis(40)).await;
    }

    #[tokio::test]
    async fn test_every_request_targets_selected_language() {
        let mut h = harness(MockAiAdapter::with_delay(1));
        h.app.settle().await;
        for lang in DisplayLanguage::ALL {
            h.app.navigate(Screen::Dashboard);
            h.app.set_language(lang);
            h.app.settle().await;

            h.app.navigate(Screen::Flashcards);
            h.app.set_flashcard_topic("Anime");
            h.app.generate_flashcards();
            h.app.settle().await;

            h.app.navigate(Screen::Analyzer);
            h.app.analyze("私は学生です");
            h.app.settle().await;

            h.app.navigate(Screen::Chat);
            h.app.send_chat("こんにちは");
            h.app.settle().await;

            let log = h.ai.log();
            assert!(log.requests.iter().rev().take(3).all(|r| r.language == lang));
            assert_eq!(log.sessions.last(), Some(&lang));
            assert_eq!(log.chat_turns.last().map(|t| t.0), Some(lang));
        }
    }
}
