//! Declarative description of a console section, rendered by the host framework.

use serde::{Deserialize, Serialize};

/// Maps a raw field value to its display form.
pub type Converter = fn(&str) -> String;

/// An entry of a select field.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SelectOption {
    pub id: String,
    pub description: String,
}

#[derive(Clone, Debug)]
pub enum FieldInput {
    Text,
    Select(Vec<SelectOption>),
}

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Translation key.
    pub label: &'static str,
    pub required: bool,
    pub converter: Option<Converter>,
    pub input: FieldInput,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: false,
            converter: None,
            input: FieldInput::Text,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn select(mut self, options: Vec<SelectOption>) -> Self {
        self.input = FieldInput::Select(options);
        self
    }

    /// The value as it should be shown, with the converter applied.
    pub fn display(&self, raw: &str) -> String {
        match self.converter {
            Some(convert) => convert(raw),
            None => raw.to_string(),
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        match &self.input {
            FieldInput::Select(options) => options,
            FieldInput::Text => &[],
        }
    }
}

fn find_field<'a>(fields: &'a [FieldDescriptor], name: &str) -> Option<&'a FieldDescriptor> {
    fields.iter().find(|field| field.name == name)
}

#[derive(Clone, Debug)]
pub struct ListView {
    pub id: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl ListView {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        find_field(&self.fields, name)
    }
}

#[derive(Clone, Debug)]
pub struct FormDescriptor {
    pub title: &'static str,
    pub button_label: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        find_field(&self.fields, name)
    }
}

/// How the host learns about completion of a submitted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollKind {
    /// The action returns an async job id which the host polls.
    AsyncJob,
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub label: &'static str,
    pub poll: PollKind,
}

#[derive(Clone, Debug)]
pub struct CreateAction {
    pub label: &'static str,
    pub form: FormDescriptor,
    pub notification: Notification,
}

#[derive(Clone, Debug)]
pub struct DetailTab {
    pub name: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

/// Link from the detail view to another section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewAllLink {
    pub path: &'static str,
    pub label: &'static str,
}

/// One rendered line of a detail view.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug)]
pub struct DetailView {
    pub tabs: Vec<DetailTab>,
    pub view_all: Option<ViewAllLink>,
}

#[derive(Clone, Debug)]
pub struct SectionDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub list_view: ListView,
    pub create_action: CreateAction,
    pub detail_view: DetailView,
}
