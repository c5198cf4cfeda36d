use ansi_term::{Color, Style};
use std::{collections::HashMap, fmt::Display};

lazy_static::lazy_static! {
    /// Styles keyed by dotted path. A child without its own base style takes
    /// its parent's, with overrides applied.
    pub static ref STYLE_MAP: HashMap<&'static str, Style> = {
        let entries: HashMap<&'static str, StyleNode> = [
            ("banner", StyleNode::Base(Color::Cyan.normal())),

            ("heading", StyleNode::Base(Style::new().bold())),
            ("heading.member", StyleNode::Inherit(Overrides::fg(Some(Color::Blue)))),

            ("name", StyleNode::Base(Color::Green.normal())),
            ("name.class", StyleNode::Inherit(Overrides::default().bold(true))),

            ("pool.index", StyleNode::Base(Color::Cyan.bold())),
            ("pool.kind", StyleNode::Base(Color::Yellow.normal())),
            ("pool.val", StyleNode::Base(Style::new())),
            ("pool.val.string", StyleNode::Base(Color::Green.normal())),

            ("access", StyleNode::Base(Color::Yellow.normal())),
            ("descriptor", StyleNode::Base(Color::Purple.normal())),

            ("opcode", StyleNode::Base(Color::Cyan.normal())),
            ("opcode.immediate", StyleNode::Base(Color::Yellow.normal())),
            ("opcode.immediate.switch", StyleNode::Inherit(Overrides::default().underline(true))),

            ("comment", StyleNode::Base(Color::Cyan.normal().dimmed())),
        ]
        .iter()
        .copied()
        .collect();

        entries
            .keys()
            .map(|&path| (path, compute_node(&entries, path).unwrap_or_default()))
            .collect()
    };
}

fn compute_node(ctx: &HashMap<&'static str, StyleNode>, name: &str) -> Option<Style> {
    match *ctx.get(name)? {
        StyleNode::Base(style) => Some(style),
        StyleNode::Inherit(overrides) => {
            let (pos, _) = name.rmatch_indices('.').next()?;
            compute_node(ctx, &name[..pos]).map(|style| overrides.apply(style))
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Overrides {
    pub foreground: Option<Option<Color>>,
    pub is_bold: Option<bool>,
    pub is_underline: Option<bool>,
}

impl Overrides {
    pub fn fg(color: Option<Color>) -> Self {
        Overrides {
            foreground: Some(color),
            ..Default::default()
        }
    }

    pub fn bold(self, bold: bool) -> Self {
        Overrides {
            is_bold: Some(bold),
            ..self
        }
    }

    pub fn underline(self, underline: bool) -> Self {
        Overrides {
            is_underline: Some(underline),
            ..self
        }
    }

    fn apply(self, style: Style) -> Style {
        Style {
            foreground: self.foreground.unwrap_or(style.foreground),
            is_bold: self.is_bold.unwrap_or(style.is_bold),
            is_underline: self.is_underline.unwrap_or(style.is_underline),
            ..style
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StyleNode {
    Base(Style),
    Inherit(Overrides),
}

/// Applies `STYLE_MAP` styles when colour is on, and passes text through
/// untouched otherwise.
#[derive(Copy, Clone, Debug)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Painter { color }
    }

    pub fn plain() -> Self {
        Painter::new(false)
    }

    pub fn paint(&self, key: &str, text: impl Display) -> String {
        match STYLE_MAP.get(key) {
            Some(style) if self.color => style.paint(text.to_string()).to_string(),
            _ => text.to_string(),
        }
    }
}
