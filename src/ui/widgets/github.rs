use crate::feeds::{EventPage, FeedData, GithubEvent};
use crate::ui::widgets::FeedWidget;
use maud::{html, Markup, Render};
use std::collections::VecDeque;

/// How pages are merged into the feed and what each card shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FeedLayout {
    /// Append in API order (newest first), with a separate date line and a
    /// "load more" control that hides after the last page.
    #[default]
    Paged,
    /// Insert at the front, so the newest page ends up on top. The byline
    /// carries the date and there is no "load more" control.
    Timeline,
}

impl FeedLayout {
    fn as_str(self) -> &'static str {
        match self {
            FeedLayout::Paged => "paged",
            FeedLayout::Timeline => "timeline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    pub title: String,
    pub creator: String,
    pub creation_date: Option<String>,
}

impl EventCard {
    pub fn from_event(event: &GithubEvent, layout: FeedLayout) -> Self {
        let title = format!("{}: {}", event.repo_name, event.event_type);
        match layout {
            FeedLayout::Paged => Self {
                title,
                creator: event.actor_login.clone(),
                creation_date: Some(event.created_at.clone()),
            },
            FeedLayout::Timeline => Self {
                title,
                creator: format!("By {} on {}", event.actor_login, event.created_at),
                creation_date: None,
            },
        }
    }
}

impl Render for EventCard {
    fn render(&self) -> Markup {
        html! {
            article class="git_event" {
                h4 class="title" { (self.title) }
                p class="creator" { (self.creator) }
                @if let Some(date) = &self.creation_date {
                    p class="creation_date" { (date) }
                }
            }
        }
    }
}

pub struct GithubEventsWidget {
    title: String,
    layout: FeedLayout,
    cards: VecDeque<EventCard>,
    load_more_visible: bool,
    loading: bool,
    error: Option<String>,
}

impl GithubEventsWidget {
    pub fn new(title: impl Into<String>, layout: FeedLayout) -> Self {
        Self {
            title: title.into(),
            layout,
            cards: VecDeque::new(),
            load_more_visible: layout == FeedLayout::Paged,
            loading: true,
            error: None,
        }
    }

    pub fn layout(&self) -> FeedLayout {
        self.layout
    }

    pub fn cards(&self) -> impl Iterator<Item = &EventCard> {
        self.cards.iter()
    }

    pub fn load_more_visible(&self) -> bool {
        self.load_more_visible
    }

    pub fn apply_page(&mut self, page: &EventPage) {
        match self.layout {
            FeedLayout::Paged => {
                for event in &page.events {
                    self.cards
                        .push_back(EventCard::from_event(event, self.layout));
                }
                if page.is_last() && self.load_more_visible {
                    tracing::debug!(page = page.page, "short page, hiding load more");
                    self.load_more_visible = false;
                }
            }
            FeedLayout::Timeline => {
                // Reversed so that front-insertion leaves the page newest-first.
                for event in page.events.iter().rev() {
                    self.cards
                        .push_front(EventCard::from_event(event, self.layout));
                }
            }
        }
    }
}

impl FeedWidget for GithubEventsWidget {
    fn id(&self) -> String {
        format!("github-{}", self.layout.as_str())
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn render(&self) -> String {
        html! {
            div class="widget" id=(self.id()) {
                h3 { (self.title) }
                section id="git_events" class=(self.layout.as_str()) {
                    @if let Some(error) = &self.error {
                        p class="error" { "Error: " (error) }
                    }
                    @if self.loading && self.cards.is_empty() {
                        p class="loading" { "Loading..." }
                    } @else if self.cards.is_empty() && self.error.is_none() {
                        p class="empty" { "No events" }
                    }
                    @for card in &self.cards {
                        (card)
                    }
                }
                @if self.layout == FeedLayout::Paged {
                    button id="git_button" type="button" hidden[!self.load_more_visible] {
                        "Load more"
                    }
                }
            }
        }
        .into_string()
    }

    fn update_data(&mut self, data: FeedData) {
        self.loading = false;
        match data {
            FeedData::GithubEvents(page) => {
                self.apply_page(&page);
                self.error = None;
            }
            FeedData::Error(e) => {
                self.error = Some(e);
            }
            FeedData::Loading => {
                self.loading = true;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn event(i: usize) -> GithubEvent {
        GithubEvent {
            repo_name: format!("octocat/repo{}", i),
            event_type: "PushEvent".to_string(),
            actor_login: "octocat".to_string(),
            created_at: format!("2017-03-{:02}T12:00:00Z", 28 - (i % 28)),
        }
    }

    fn page(number: u32, range: std::ops::Range<usize>) -> EventPage {
        EventPage {
            page: number,
            events: range.map(event).collect(),
            per_page: 30,
        }
    }

    fn titles(html: &str) -> Vec<String> {
        let doc = Html::parse_fragment(html);
        let selector = Selector::parse("#git_events .git_event .title").unwrap();
        doc.select(&selector)
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    fn button_hidden(html: &str) -> Option<bool> {
        let doc = Html::parse_fragment(html);
        let selector = Selector::parse("#git_button").unwrap();
        doc.select(&selector)
            .next()
            .map(|b| b.value().attr("hidden").is_some())
    }

    #[test]
    fn test_paged_card_fields() {
        let card = EventCard::from_event(&event(1), FeedLayout::Paged);
        assert_eq!(card.title, "octocat/repo1: PushEvent");
        assert_eq!(card.creator, "octocat");
        assert_eq!(card.creation_date.as_deref(), Some("2017-03-27T12:00:00Z"));
    }

    #[test]
    fn test_timeline_card_fields() {
        let card = EventCard::from_event(&event(1), FeedLayout::Timeline);
        assert_eq!(card.title, "octocat/repo1: PushEvent");
        assert_eq!(card.creator, "By octocat on 2017-03-27T12:00:00Z");
        assert_eq!(card.creation_date, None);
    }

    #[test]
    fn test_paged_appends_after_existing() {
        let mut widget = GithubEventsWidget::new("GitHub", FeedLayout::Paged);
        widget.update_data(FeedData::GithubEvents(page(1, 0..30)));
        widget.update_data(FeedData::GithubEvents(page(2, 30..35)));

        let html = widget.render();
        let titles = titles(&html);
        assert_eq!(titles.len(), 35);
        assert_eq!(titles[0], "octocat/repo0: PushEvent");
        assert_eq!(titles[29], "octocat/repo29: PushEvent");
        assert_eq!(titles[30], "octocat/repo30: PushEvent");
        assert_eq!(titles[34], "octocat/repo34: PushEvent");
    }

    #[test]
    fn test_full_page_keeps_load_more_visible() {
        let mut widget = GithubEventsWidget::new("GitHub", FeedLayout::Paged);
        widget.update_data(FeedData::GithubEvents(page(1, 0..30)));
        assert!(widget.load_more_visible());
        assert_eq!(button_hidden(&widget.render()), Some(false));
    }

    #[test]
    fn test_short_page_hides_load_more_for_good() {
        let mut widget = GithubEventsWidget::new("GitHub", FeedLayout::Paged);
        widget.update_data(FeedData::GithubEvents(page(1, 0..12)));
        assert!(!widget.load_more_visible());

        widget.update_data(FeedData::GithubEvents(page(2, 12..42)));
        assert!(!widget.load_more_visible());
        assert_eq!(button_hidden(&widget.render()), Some(true));
    }

    #[test]
    fn test_empty_page_hides_load_more() {
        let mut widget = GithubEventsWidget::new("GitHub", FeedLayout::Paged);
        widget.update_data(FeedData::GithubEvents(page(1, 0..0)));
        assert!(!widget.load_more_visible());
        assert!(titles(&widget.render()).is_empty());
    }

    #[test]
    fn test_timeline_prepend_keeps_page_order_above_existing() {
        let mut widget = GithubEventsWidget::new("GitHub", FeedLayout::Timeline);
        widget.update_data(FeedData::GithubEvents(page(1, 10..13)));
        widget.update_data(FeedData::GithubEvents(page(2, 0..4)));

        let titles = titles(&widget.render());
        let expected: Vec<String> = [0, 1, 2, 3, 10, 11, 12]
            .iter()
            .map(|i| format!("octocat/repo{}: PushEvent", i))
            .collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn test_timeline_has_no_date_or_button() {
        let mut widget = GithubEventsWidget::new("GitHub", FeedLayout::Timeline);
        widget.update_data(FeedData::GithubEvents(page(1, 0..2)));
        let html = widget.render();

        let doc = Html::parse_fragment(&html);
        let date = Selector::parse(".creation_date").unwrap();
        assert_eq!(doc.select(&date).count(), 0);
        assert_eq!(button_hidden(&html), None);
    }

    #[test]
    fn test_event_text_is_escaped() {
        let mut widget = GithubEventsWidget::new("GitHub", FeedLayout::Paged);
        let mut evil = event(0);
        evil.repo_name = "<script>alert(1)</script>".to_string();
        widget.update_data(FeedData::GithubEvents(EventPage {
            page: 1,
            events: vec![evil],
            per_page: 30,
        }));

        let html = widget.render();
        assert!(!html.contains("<script>"));
        assert_eq!(titles(&html), vec!["<script>alert(1)</script>: PushEvent"]);
    }

    #[test]
    fn test_error_keeps_existing_cards() {
        let mut widget = GithubEventsWidget::new("GitHub", FeedLayout::Paged);
        widget.update_data(FeedData::GithubEvents(page(1, 0..30)));
        widget.update_data(FeedData::Error("HttpError".to_string()));

        let html = widget.render();
        assert!(html.contains("Error: HttpError"));
        assert_eq!(titles(&html).len(), 30);
    }

    #[test]
    fn test_loading_placeholder_before_first_page() {
        let widget = GithubEventsWidget::new("GitHub", FeedLayout::Paged);
        assert!(widget.render().contains("Loading..."));
    }
}
