// Transform: element-wise preprocessing inside a pipeline

/// A transform applied to each element as it streams past.
///
/// Any `Fn(T) -> U + Send + Sync` closure is a transform, so
/// `dataset.map(|w: String| w.len())` works without a wrapper type.
pub trait Transform<T, U>: Send + Sync {
    fn apply(&self, input: T) -> U;
}

impl<T, U, F> Transform<T, U> for F
where
    F: Fn(T) -> U + Send + Sync,
{
    fn apply(&self, input: T) -> U {
        self(input)
    }
}

// Built-in text transforms

/// Lowercase every character of a window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lowercase;

impl Transform<String, String> for Lowercase {
    fn apply(&self, input: String) -> String {
        input.to_lowercase()
    }
}

/// Replace every run of whitespace with a single space.
///
/// Useful for corpora with source-code indentation, where most windows would
/// otherwise be dominated by spaces and newlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseWhitespace;

impl Transform<String, String> for CollapseWhitespace {
    fn apply(&self, input: String) -> String {
        let mut out = String::with_capacity(input.len());
        let mut in_space = false;
        for c in input.chars() {
            if c.is_whitespace() {
                if !in_space {
                    out.push(' ');
                }
                in_space = true;
            } else {
                out.push(c);
                in_space = false;
            }
        }
        out
    }
}

/// Chain multiple text transforms.
pub struct Compose {
    transforms: Vec<Box<dyn Transform<String, String>>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn Transform<String, String>>>) -> Self {
        Self { transforms }
    }
}

impl Transform<String, String> for Compose {
    fn apply(&self, mut input: String) -> String {
        for t in &self.transforms {
            input = t.apply(input);
        }
        input
    }
}
