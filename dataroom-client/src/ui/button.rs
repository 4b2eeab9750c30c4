use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Danger,
    Ghost,
}

impl ButtonVariant {
    fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            ButtonVariant::Primary => ("[ ", " ]"),
            ButtonVariant::Secondary => ("( ", " )"),
            ButtonVariant::Danger => ("[! ", " !]"),
            ButtonVariant::Ghost => ("", ""),
        }
    }
}

/// Stateless button: a label, a look and whether it can be pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub variant: ButtonVariant,
    pub disabled: bool,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            variant: ButtonVariant::default(),
            disabled: false,
        }
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = self.variant.delimiters();
        write!(f, "{}{}{}", open, self.label, close)?;
        if self.disabled {
            write!(f, " (disabled)")?;
        }
        Ok(())
    }
}
