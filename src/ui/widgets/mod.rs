pub mod content;
pub mod github;
pub mod post_form;

use crate::feeds::FeedData;

pub trait FeedWidget {
    fn id(&self) -> String;
    fn title(&self) -> &str;
    fn render(&self) -> String;
    fn update_data(&mut self, data: FeedData);
}
