use crate::error::FeedError;
use crate::feeds::posts::edit_action_path;
use crate::feeds::{FeedData, PostRecord, Visibility};
use crate::ui::widgets::FeedWidget;
use maud::{html, Markup, Render};

/// Edit form values derived from a fetched post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub action: String,
    pub title: String,
    pub description: String,
    pub content_type: String,
    pub content: String,
    pub categories: String,
    pub visibility: Visibility,
    pub visible_to: String,
    pub post_id: String,
}

impl PostForm {
    pub fn from_record(post: &PostRecord) -> Result<Self, FeedError> {
        let visibility = if post.unlisted {
            Visibility::Unlisted
        } else {
            post.visibility
        };

        Ok(Self {
            action: edit_action_path(&post.id)?,
            title: post.title.clone(),
            description: post.description.clone(),
            content_type: post.content_type.clone(),
            content: post.content.clone(),
            categories: post.categories.join(","),
            visibility,
            visible_to: post.visible_to.join(","),
            post_id: post.id.clone(),
        })
    }
}

impl Render for PostForm {
    fn render(&self) -> Markup {
        html! {
            form method="post" action=(self.action) {
                (text_input("id_title", "title", &self.title, false))
                (text_input("id_description", "description", &self.description, false))
                (hidden_input("id_contentType", "contentType", &self.content_type))
                textarea id="id_content" name="content" class="form-control" rows="15" cols="50" {
                    (self.content)
                }
                (text_input("id_categories", "categories", &self.categories, false))
                select id="id_visibility" name="visibility" class="form-control" {
                    @for v in Visibility::ALL {
                        option value=(v.as_str()) selected[v == self.visibility] { (v.label()) }
                    }
                }
                (text_input("id_visibleTo", "visibleTo", &self.visible_to, true))
                (hidden_input("id_post_id", "post_id", &self.post_id))
                button type="submit" { "Save" }
            }
        }
    }
}

fn text_input(id: &str, name: &str, value: &str, disabled: bool) -> Markup {
    html! {
        input type="text" id=(id) name=(name) class="form-control" value=(value) disabled[disabled];
    }
}

fn hidden_input(id: &str, name: &str, value: &str) -> Markup {
    html! {
        input type="hidden" id=(id) name=(name) value=(value);
    }
}

/// Modal holding the edit form for one post.
pub struct PostFormWidget {
    form: Option<PostForm>,
    open: bool,
    loading: bool,
    error: Option<String>,
}

impl PostFormWidget {
    pub fn new() -> Self {
        Self {
            form: None,
            open: false,
            loading: true,
            error: None,
        }
    }

    pub fn form(&self) -> Option<&PostForm> {
        self.form.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn populate(&mut self, post: &PostRecord) -> Result<(), FeedError> {
        self.form = Some(PostForm::from_record(post)?);
        self.error = None;
        self.open = true;
        Ok(())
    }
}

impl Default for PostFormWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedWidget for PostFormWidget {
    fn id(&self) -> String {
        "post_form".to_string()
    }

    fn title(&self) -> &str {
        "Edit post"
    }

    fn render(&self) -> String {
        html! {
            div id=(self.id()) class="modal" data-open=(if self.open { "true" } else { "false" }) {
                h3 class="modal-title" { (self.title()) }
                @if let Some(error) = &self.error {
                    p class="error" { "Error: " (error) }
                }
                @if let Some(form) = &self.form {
                    (form)
                } @else if self.loading {
                    p class="loading" { "Loading..." }
                }
            }
        }
        .into_string()
    }

    fn update_data(&mut self, data: FeedData) {
        self.loading = false;
        match data {
            FeedData::Post(post) => {
                if let Err(e) = self.populate(&post) {
                    self.error = Some(e.to_string());
                }
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
