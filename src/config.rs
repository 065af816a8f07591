use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub csrf_cookie_name: String,
    pub csrf_header_name: String,
    pub markup: Markup,
    pub styles: VoteStyles,
    pub messages: Messages,
}

/// Class and `data-*` names of the server-rendered markup.
#[derive(Debug, Clone)]
pub struct Markup {
    pub vote_widget_class: String,
    pub vote_button_class: String,
    pub counter_class: String,
    pub answer_widget_class: String,
    pub toggle_class: String,
    pub content_id_key: String,
    pub content_type_key: String,
    pub user_vote_key: String,
    pub vote_type_key: String,
    pub bound_key: String,
}

#[derive(Debug, Clone)]
pub struct VoteStyles {
    pub upvote_active: String,
    pub downvote_active: String,
    pub neutral: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Ru,
}

impl std::str::FromStr for Language {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            other => Err(AppError::Config(format!("Unsupported UI_LANGUAGE: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Messages {
    pub not_authenticated: String,
    pub cannot_accept_foreign_answer: String,
    pub accept_failed: String,
    pub vote_failed_prefix: String,
    /// `{status}` is replaced with the numeric HTTP status.
    pub http_error_template: String,
}

impl Messages {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::En => Self {
                not_authenticated: "You are not logged in".to_string(),
                cannot_accept_foreign_answer:
                    "You cannot accept an answer to someone else's question!".to_string(),
                accept_failed: "Network response was not ok".to_string(),
                vote_failed_prefix: "An error occurred: ".to_string(),
                http_error_template: "HTTP error {status}".to_string(),
            },
            Language::Ru => Self {
                not_authenticated: "Вы не авторизованы".to_string(),
                cannot_accept_foreign_answer: "Вы не можете одобрить ответ на чужой вопрос!"
                    .to_string(),
                accept_failed: "Не удалось выполнить запрос".to_string(),
                vote_failed_prefix: "Произошла ошибка: ".to_string(),
                http_error_template: "HTTP error {status}".to_string(),
            },
        }
    }

    pub fn http_error(&self, status: u16) -> String {
        self.http_error_template
            .replace("{status}", &status.to_string())
    }
}

impl Default for Markup {
    fn default() -> Self {
        Self {
            vote_widget_class: "card__likes".to_string(),
            vote_button_class: "vote-btn".to_string(),
            counter_class: "vote-counter".to_string(),
            answer_widget_class: "question__answer".to_string(),
            toggle_class: "correct-tick".to_string(),
            content_id_key: "content-id".to_string(),
            content_type_key: "content-type".to_string(),
            user_vote_key: "user-vote".to_string(),
            vote_type_key: "vote-type".to_string(),
            bound_key: "votes-bound".to_string(),
        }
    }
}

impl Default for VoteStyles {
    fn default() -> Self {
        Self {
            upvote_active: "btn-success".to_string(),
            downvote_active: "btn-danger".to_string(),
            neutral: "btn-secondary".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            csrf_cookie_name: "csrftoken".to_string(),
            csrf_header_name: "X-CSRFToken".to_string(),
            markup: Markup::default(),
            styles: VoteStyles::default(),
            messages: Messages::for_language(Language::En),
        }
    }
}

/// What the host page says about itself: `<html lang>`, the location origin
/// and optional `data-api-base-url` / `data-csrf-cookie` / `data-csrf-header`
/// overrides on `<body>`.
#[derive(Debug, Clone, Default)]
pub struct PageSettings {
    pub lang: Option<String>,
    pub origin: Option<String>,
    pub api_base_url: Option<String>,
    pub csrf_cookie_name: Option<String>,
    pub csrf_header_name: Option<String>,
}

impl PageSettings {
    pub fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "UI_LANGUAGE" => self.language(),
            "API_BASE_URL" => self.api_base_url.clone().or_else(|| self.origin.clone()),
            "CSRF_COOKIE_NAME" => self.csrf_cookie_name.clone(),
            "CSRF_HEADER_NAME" => self.csrf_header_name.clone(),
            _ => None,
        }
    }

    /// Primary subtag of `lang` when it is a supported UI language.
    fn language(&self) -> Option<String> {
        let lang = self.lang.as_deref()?.trim();
        let primary = lang.split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.parse::<Language>() {
            Ok(_) => Some(primary),
            Err(_) => {
                if !primary.is_empty() {
                    tracing::warn!("Page language {} is not supported, using English", lang);
                }
                None
            }
        }
    }
}

impl Config {
    /// Configuration carried by the page the widgets live on.
    pub fn from_page(settings: &PageSettings) -> Result<Self> {
        Self::from_lookup(|key| settings.lookup(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let language = match lookup("UI_LANGUAGE") {
            Some(value) => value.parse()?,
            None => Language::En,
        };

        Ok(Self {
            api_base_url: lookup("API_BASE_URL").unwrap_or(defaults.api_base_url),
            csrf_cookie_name: lookup("CSRF_COOKIE_NAME").unwrap_or(defaults.csrf_cookie_name),
            csrf_header_name: lookup("CSRF_HEADER_NAME").unwrap_or(defaults.csrf_header_name),
            markup: defaults.markup,
            styles: defaults.styles,
            messages: Messages::for_language(language),
        })
    }
}
