use super::tree::{Operand, Roll, RollResult};
use crate::common::Int;
use std::fmt;

pub const DICE_GLYPH: &str = "🎲 ";
pub const ERROR_GLYPH: &str = "❌ ";
pub const SUCCESS_GLYPH: &str = "✅ ";

fn fmt_list<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    let inner = items
        .into_iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("[{}]", inner)
}

pub trait Stringify {
    fn stringify(&mut self, result: &RollResult) -> String {
        let steps = self.str_steps(result);
        format!("{} = {} = {}", result.expression, steps, result.total)
    }

    fn str_steps(&mut self, result: &RollResult) -> String {
        let mut ret = String::new();
        for step in result.steps() {
            if let Some(op) = step.op {
                ret.push_str(&format!(" {} ", op));
            }
            let part = match step.operand {
                Operand::Literal(x) => self.str_literal(x),
                Operand::Roll(i) => result
                    .rolls
                    .get(i)
                    .map(|roll| self.str_roll(roll))
                    .unwrap_or_default(),
            };
            ret.push_str(&part);
        }
        ret
    }

    fn str_literal(&mut self, x: Int) -> String {
        x.to_string()
    }

    fn str_roll(&mut self, roll: &Roll) -> String {
        let mut ret = fmt_list(&roll.raw_results);
        if roll.is_selected() {
            ret.push('→');
            ret.push_str(&fmt_list(&roll.final_results));
        }
        ret
    }
}

/// Renders the plain evaluation trace stored in [RollResult::detail].
#[derive(Default)]
pub struct SimpleStringifier;

impl SimpleStringifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stringify for SimpleStringifier {}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FormatOptions {
    /// Printed on its own line above the result.
    pub description: Option<String>,
    pub show_emoji: bool,
}

impl FormatOptions {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn without_emoji(mut self) -> Self {
        self.show_emoji = false;
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            description: None,
            show_emoji: true,
        }
    }
}

/// Renders a result for display to a user.
///
/// Rolls without rerolls use the single-line form `expression = detail = total`. Once any
/// roll was rerolled, every dice term shows each replaced die as a chain of values and
/// lists its rerolls after it.
pub struct MessageStringifier<'o> {
    options: &'o FormatOptions,
}

impl<'o> MessageStringifier<'o> {
    pub fn new(options: &'o FormatOptions) -> Self {
        Self { options }
    }

    fn fmt_die(roll: &Roll, index: usize, value: u32) -> String {
        let mut chain = roll.rerolls_at(index);
        match chain.next() {
            Some(first) => {
                let mut ret = first.to_string();
                for record in chain {
                    ret.push('→');
                    ret.push_str(&record.rerolled_value.to_string());
                }
                ret
            }
            None => value.to_string(),
        }
    }
}

impl Stringify for MessageStringifier<'_> {
    fn stringify(&mut self, result: &RollResult) -> String {
        let mut ret = String::new();
        if let Some(description) = &self.options.description {
            ret.push_str(description);
            ret.push('\n');
        }
        if self.options.show_emoji {
            ret.push_str(DICE_GLYPH);
        }

        let body = if result.has_rerolls() {
            self.str_steps(result)
        } else {
            result.detail.clone()
        };
        ret.push_str(&format!("{} = {} = {}", result.expression, body, result.total));
        ret
    }

    fn str_roll(&mut self, roll: &Roll) -> String {
        let dice = roll
            .raw_results
            .iter()
            .enumerate()
            .map(|(i, &value)| Self::fmt_die(roll, i, value));
        let mut ret = fmt_list(dice);

        if roll.is_selected() {
            ret.push('→');
            ret.push_str(&fmt_list(&roll.final_results));
        }

        if roll.has_rerolls() {
            let records = roll
                .reroll_history
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            ret.push_str(&format!(" (rerolled: {})", records));
        }
        ret
    }
}

pub fn format(result: &RollResult, options: &FormatOptions) -> String {
    MessageStringifier::new(options).stringify(result)
}

pub fn error_message(msg: impl fmt::Display) -> String {
    format!("{}{}", ERROR_GLYPH, msg)
}

pub fn success_message(msg: impl fmt::Display) -> String {
    format!("{}{}", SUCCESS_GLYPH, msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::{roller::SequenceRoller, RollContext};

    fn eval(input: &str, values: &[u32]) -> RollResult {
        let ast = crate::parse(input).unwrap();
        RollContext::new(SequenceRoller::new(values.iter().copied())).eval(&ast)
    }

    macro_rules! check {
        ($input:expr, $values:expr, $options:expr, $expected:expr) => {
            let roll = eval($input, &$values);
            let actual = format(&roll, &$options);
            assert_eq!(&actual, $expected);
        };
    }

    #[test]
    fn test_simple_stringify() {
        let roll = eval("3d6+2", &[4, 5, 3]);
        assert_eq!(SimpleStringifier::new().stringify(&roll), "3d6+2 = [4,5,3] + 2 = 14");
        assert_eq!(roll.to_string(), "3d6+2 = [4,5,3] + 2 = 14");
    }

    #[test]
    fn test_single_line() {
        let plain = FormatOptions::default().without_emoji();
        check!("d20", [15], FormatOptions::default(), "🎲 d20 = [15] = 15");
        check!("3d6+2", [4, 5, 3], plain, "3d6+2 = [4,5,3] + 2 = 14");
        check!("4d6kh1", [4, 5, 3, 2], plain, "4d6kh1 = [4,5,3,2]→[5] = 5");
        check!(
            "1d6 * 2",
            [3],
            FormatOptions::default().with_description("Fireball"),
            "Fireball\n🎲 1d6 * 2 = [3] * 2 = 6"
        );
    }

    #[test]
    fn test_reroll_once_multi_part() {
        check!(
            "2d10r2+5",
            [1, 4, 7],
            FormatOptions::default(),
            "🎲 2d10r2+5 = [1→4,7] (rerolled: 1→4) + 5 = 16"
        );
    }

    #[test]
    fn test_reroll_recursive_chain() {
        check!(
            "3d6kh2rr2",
            [1, 2, 5, 3, 2, 4],
            FormatOptions::default().without_emoji(),
            "3d6kh2rr2 = [1→2→5,3,2→4]→[5,4] (rerolled: 1→2, 2→5, 2→4) = 9"
        );
    }

    #[test]
    fn test_reroll_then_explode_multi_part() {
        check!(
            "d6!r1",
            [1, 6, 4],
            FormatOptions::default().without_emoji(),
            "d6!r1 = [1→6,4] (rerolled: 1→6) = 10"
        );
    }

    #[test]
    fn test_multi_part_lists_every_roll() {
        check!(
            "d6r1 + d6 - 1",
            [1, 3, 6],
            FormatOptions::default().without_emoji(),
            "d6r1 + d6 - 1 = [1→3] (rerolled: 1→3) + [6] - 1 = 8"
        );
    }

    #[test]
    fn test_format_is_pure() {
        let roll = eval("2d10r2+5", &[1, 4, 7]);
        let options = FormatOptions::default().with_description("attack");
        assert_eq!(format(&roll, &options), format(&roll, &options));
    }

    #[test]
    fn test_glyph_helpers() {
        assert_eq!(error_message("bad dice"), "❌ bad dice");
        assert_eq!(success_message(42), "✅ 42");
    }
}
