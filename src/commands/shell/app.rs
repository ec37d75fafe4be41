use std::io::{self, Write};

use anyhow::Result;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::effect::Effects;
use crate::model::MetaOptions;
use crate::views::Message;
use crate::views::details::DetailsPage;
use crate::views::form::{REQUIRED_HINT, RecommendationForm, resolve_choice};
use crate::views::main_page::MainPage;
use crate::views::router::{MAIN_PATH, NavState, Navigation, Route, Router};

use super::command::ShellCommand;

pub enum Page {
    Main(MainPage),
    Details(DetailsPage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Render,
    Help,
    Quit,
}

pub struct App {
    client: ApiClient,
    effects: Effects<Message>,
    router: Router,
    path: String,
    state: Option<NavState>,
    page: Page,
    form_memory: Option<RecommendationForm>,
    labels: Option<MetaOptions>,
}

impl App {
    pub fn new(client: ApiClient) -> Result<Self> {
        let router = Router::new()?;
        let mut effects = Effects::new();
        let page = Page::Main(MainPage::mount(&client, &mut effects, None));

        Ok(Self {
            client,
            effects,
            router,
            path: MAIN_PATH.to_string(),
            state: None,
            page,
            form_memory: None,
            labels: None,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    #[cfg(test)]
    pub fn state(&self) -> Option<&NavState> {
        self.state.as_ref()
    }

    #[cfg(test)]
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn navigate(&mut self, navigation: Navigation) {
        let resolution = self.router.resolve(&navigation.path);
        let state = if resolution.redirected {
            None
        } else {
            navigation.state
        };
        info!(path = %resolution.path, with_state = state.is_some(), "navigating");

        match (&mut self.page, &resolution.route) {
            (Page::Main(_), Route::Main) => {}
            (Page::Details(page), Route::Details { approach_segment }) => {
                page.update(
                    approach_segment,
                    state.as_ref(),
                    &self.client,
                    &mut self.effects,
                );
            }
            _ => {
                self.teardown();
                self.page = self.mount(&resolution.route, state.as_ref());
            }
        }

        self.path = resolution.path;
        self.state = state;
    }

    fn mount(&mut self, route: &Route, state: Option<&NavState>) -> Page {
        match route {
            Route::Main => Page::Main(MainPage::mount(
                &self.client,
                &mut self.effects,
                self.form_memory.take(),
            )),
            Route::Details { approach_segment } => {
                let mut page =
                    DetailsPage::mount(approach_segment, state, &self.client, &mut self.effects);
                if let Some(labels) = &self.labels {
                    page.set_labels(labels.clone());
                }
                Page::Details(page)
            }
        }
    }

    fn teardown(&mut self) {
        match &self.page {
            Page::Main(page) => {
                if page.meta().is_ready() {
                    self.labels = Some(page.meta().data.clone());
                }
                self.form_memory = Some(page.unmount());
            }
            Page::Details(page) => page.unmount(),
        }
    }

    pub fn settle(&mut self) {
        while let Some(message) = self.effects.next() {
            match (&mut self.page, message) {
                (Page::Main(page), Message::MetaLoaded(outcome)) => page.apply_meta(outcome),
                (Page::Main(page), Message::RecommendationsLoaded { request, outcome }) => {
                    page.apply_results(request, outcome)
                }
                (Page::Details(page), Message::DetailsLoaded(outcome)) => page.apply(outcome),
                _ => debug!("message does not belong to the mounted page"),
            }
        }
    }

    pub fn execute(&mut self, command: ShellCommand) -> Result<Flow, String> {
        match command {
            ShellCommand::Help => return Ok(Flow::Help),
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Show => {}
            ShellCommand::Problem(text) => self.main_form()?.1.set_problem_text(text),
            ShellCommand::Select { field, input } => {
                let (meta, form) = self.main_form()?;
                let iri = resolve_choice(field.options(meta), &input, field.label())?;
                form.select(field, iri);
            }
            ShellCommand::Toggle { field, input } => {
                let (meta, form) = self.main_form()?;
                let iri = resolve_choice(field.options(meta), &input, field.label())?;
                form.toggle(field, &iri);
            }
            ShellCommand::Submit => {
                let Page::Main(page) = &mut self.page else {
                    return Err("submit is only available on the form page".to_string());
                };
                if !page.submit(&self.client, &mut self.effects) {
                    let reason = if page.is_submitting() {
                        "a submission is already running"
                    } else if !page.meta().is_ready() {
                        "metadata is not available"
                    } else {
                        REQUIRED_HINT
                    };
                    return Err(reason.to_string());
                }
            }
            ShellCommand::Open(rank) => {
                let Page::Main(page) = &self.page else {
                    return Err("open is only available on the form page".to_string());
                };
                let navigation = page
                    .open(rank)
                    .ok_or_else(|| format!("result {rank} cannot be opened"))?;
                self.navigate(navigation);
            }
            ShellCommand::Go(path) => self.navigate(Navigation::to(path)),
            ShellCommand::Back => self.navigate(Navigation::to(MAIN_PATH)),
            ShellCommand::Search(query) => {
                let Page::Details(page) = &mut self.page else {
                    return Err("search is only available on a details page".to_string());
                };
                page.set_article_query(query);
            }
            ShellCommand::Reset => {
                let Page::Main(page) = &mut self.page else {
                    return Err("reset is only available on the form page".to_string());
                };
                page.reset();
                self.form_memory = None;
            }
        }
        Ok(Flow::Render)
    }

    fn main_form(&mut self) -> Result<(&MetaOptions, &mut RecommendationForm), String> {
        let Page::Main(page) = &mut self.page else {
            return Err("the form is only available on the form page".to_string());
        };
        if !page.meta().is_ready() {
            return Err("the form is unavailable until metadata has loaded".to_string());
        }
        Ok(page.meta_and_form_mut())
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "== {}", self.path)?;
        match &self.page {
            Page::Main(page) => page.render(out),
            Page::Details(page) => page.render(out),
        }
    }
}
