use crate::domain::fields::read_gsc;
use serde::Serialize;
use serde_json::{Map, Value};

pub const PRICE_COLOR: u32 = 0x1ABC9C;
pub const HELP_COLOR: u32 = 0x3498DB;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Chat embed: a title and a list of named values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            color,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    /// One field per `<name>_g/_s/_c` triple, in map order.
    pub fn from_money_map(title: impl Into<String>, map: &Map<String, Value>) -> Self {
        map.keys()
            .filter_map(|key| key.strip_suffix("_g"))
            .filter_map(|name| read_gsc(map, name).map(|gsc| (name, gsc)))
            .fold(Embed::new(title, PRICE_COLOR), |embed, (name, gsc)| {
                embed.field(
                    title_case(name),
                    format!("{}g {}s {}c", gsc.gold, gsc.silver, gsc.copper),
                )
            })
    }
}

/// `crafting_cost` becomes `Crafting Cost`.
pub fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
