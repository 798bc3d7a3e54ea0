use std::fmt;

use cmdtree_diagnostics::{CommandSyntaxError, codes};

use super::ArgumentType;
use crate::context::{ArgumentError, CommandContext};
use crate::reader::StringReader;

/// Generates a bounded numeric argument type.
///
/// Bounds are inclusive. A value outside them fails with the type's
/// too-low/too-high code, positioned at the start of the number.
macro_rules! bounded_number {
    (
        $(#[$meta:meta])*
        $name:ident, $value:ty, $read:ident, $label:literal,
        too_low = $too_low:path, too_high = $too_high:path,
        ctor = $ctor:ident, between = $between:ident, getter = $getter:ident,
        examples = [$($example:literal),*]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            minimum: $value,
            maximum: $value,
        }

        impl $name {
            /// Accept any value the type can represent.
            pub const fn new() -> Self {
                Self { minimum: <$value>::MIN, maximum: <$value>::MAX }
            }

            /// Accept values `>= minimum`.
            pub const fn at_least(minimum: $value) -> Self {
                Self { minimum, maximum: <$value>::MAX }
            }

            /// Accept values in `minimum..=maximum`.
            pub const fn between(minimum: $value, maximum: $value) -> Self {
                Self { minimum, maximum }
            }

            /// Inclusive lower bound.
            pub const fn minimum(&self) -> $value {
                self.minimum
            }

            /// Inclusive upper bound.
            pub const fn maximum(&self) -> $value {
                self.maximum
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        #[doc = concat!("An unbounded [`", stringify!($name), "`].")]
        pub const fn $ctor() -> $name {
            $name::new()
        }

        #[doc = concat!("A [`", stringify!($name), "`] bounded to `minimum..=maximum`.")]
        pub const fn $between(minimum: $value, maximum: $value) -> $name {
            $name::between(minimum, maximum)
        }

        #[doc = concat!("Fetch a `", stringify!($value), "` argument from `context`.")]
        pub fn $getter<S>(
            context: &CommandContext<S>,
            name: &str,
        ) -> Result<$value, ArgumentError> {
            context.argument::<$value>(name)
        }

        impl ArgumentType for $name {
            type Value = $value;

            fn parse(&self, reader: &mut StringReader) -> Result<$value, CommandSyntaxError> {
                let start = reader.cursor();
                let result = reader.$read()?;
                if result < self.minimum {
                    reader.set_cursor(start);
                    return Err(reader.syntax_error(
                        $too_low,
                        &[("minimum", self.minimum.to_string()), ("found", result.to_string())],
                    ));
                }
                if result > self.maximum {
                    reader.set_cursor(start);
                    return Err(reader.syntax_error(
                        $too_high,
                        &[("maximum", self.maximum.to_string()), ("found", result.to_string())],
                    ));
                }
                Ok(result)
            }

            fn examples(&self) -> Vec<String> {
                vec![$($example.to_string()),*]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.minimum == <$value>::MIN && self.maximum == <$value>::MAX {
                    write!(f, "{}()", $label)
                } else if self.maximum == <$value>::MAX {
                    write!(f, "{}({})", $label, self.minimum)
                } else {
                    write!(f, "{}({}, {})", $label, self.minimum, self.maximum)
                }
            }
        }
    };
}

bounded_number!(
    /// A 32-bit signed integer.
    IntegerArgument, i32, read_int, "integer",
    too_low = codes::INTEGER_TOO_LOW, too_high = codes::INTEGER_TOO_HIGH,
    ctor = integer, between = integer_between, getter = get_integer,
    examples = ["0", "123", "-123"]
);

bounded_number!(
    /// A 64-bit signed integer.
    LongArgument, i64, read_long, "longArg",
    too_low = codes::LONG_TOO_LOW, too_high = codes::LONG_TOO_HIGH,
    ctor = long, between = long_between, getter = get_long,
    examples = ["0", "123", "-123"]
);

bounded_number!(
    /// A single-precision float.
    FloatArgument, f32, read_float, "float",
    too_low = codes::FLOAT_TOO_LOW, too_high = codes::FLOAT_TOO_HIGH,
    ctor = float, between = float_between, getter = get_float,
    examples = ["0", "1.2", ".5", "-1", "-.5", "-1234.56"]
);

bounded_number!(
    /// A double-precision float.
    DoubleArgument, f64, read_double, "double",
    too_low = codes::DOUBLE_TOO_LOW, too_high = codes::DOUBLE_TOO_HIGH,
    ctor = double, between = double_between, getter = get_double,
    examples = ["0", "1.2", ".5", "-1", "-.5", "-1234.56"]
);

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: ArgumentType>(argument: T, input: &str) -> Result<T::Value, CommandSyntaxError> {
        argument.parse(&mut StringReader::new(input))
    }

    // ── Integer ─────────────────────────────────────────────────────────

    #[test]
    fn integer_parse() {
        let mut reader = StringReader::new("15 rest");
        assert_eq!(integer().parse(&mut reader).unwrap(), 15);
        assert_eq!(reader.remaining(), " rest");
    }

    #[test]
    fn integer_too_low_reports_token_start() {
        let err = parse(integer_between(0, 100), "-5").unwrap_err();
        assert!(err.is(codes::INTEGER_TOO_LOW));
        assert_eq!(err.cursor(), Some(0));
        assert_eq!(err.message(), "Integer must not be less than 0, found -5");
    }

    #[test]
    fn integer_too_high_reports_token_start() {
        let err = parse(integer_between(-100, 0), "5").unwrap_err();
        assert!(err.is(codes::INTEGER_TOO_HIGH));
        assert_eq!(err.cursor(), Some(0));
    }

    #[test]
    fn integer_bounds_are_inclusive() {
        assert_eq!(parse(integer_between(-100, 100), "-100").unwrap(), -100);
        assert_eq!(parse(integer_between(-100, 100), "100").unwrap(), 100);
    }

    #[test]
    fn integer_display() {
        assert_eq!(integer().to_string(), "integer()");
        assert_eq!(IntegerArgument::at_least(-100).to_string(), "integer(-100)");
        assert_eq!(integer_between(-100, 100).to_string(), "integer(-100, 100)");
    }

    #[test]
    fn integer_equality_covers_bounds() {
        assert_eq!(integer(), IntegerArgument::default());
        assert_ne!(integer(), integer_between(-100, 100));
    }

    // ── Long ────────────────────────────────────────────────────────────

    #[test]
    fn long_parse() {
        assert_eq!(parse(long(), "15").unwrap(), 15);
    }

    #[test]
    fn long_too_small_and_big() {
        let low = parse(long_between(0, 100), "-5").unwrap_err();
        assert!(low.is(codes::LONG_TOO_LOW));
        assert_eq!(low.cursor(), Some(0));
        let high = parse(long_between(-100, 0), "5").unwrap_err();
        assert!(high.is(codes::LONG_TOO_HIGH));
        assert_eq!(high.cursor(), Some(0));
    }

    #[test]
    fn long_display() {
        assert_eq!(long().to_string(), "longArg()");
        assert_eq!(LongArgument::at_least(-100).to_string(), "longArg(-100)");
        assert_eq!(long_between(-100, 100).to_string(), "longArg(-100, 100)");
        assert_eq!(
            long_between(i64::MIN, 100).to_string(),
            "longArg(-9223372036854775808, 100)"
        );
    }

    // ── Float / Double ──────────────────────────────────────────────────

    #[test]
    fn float_parse_and_bounds() {
        assert_eq!(parse(float(), "1.5").unwrap(), 1.5);
        let err = parse(float_between(0.0, 1.0), "1.5").unwrap_err();
        assert!(err.is(codes::FLOAT_TOO_HIGH));
    }

    #[test]
    fn double_parse_and_bounds() {
        assert_eq!(parse(double(), "-.5").unwrap(), -0.5);
        let err = parse(double_between(0.0, 1.0), "-2").unwrap_err();
        assert!(err.is(codes::DOUBLE_TOO_LOW));
        assert_eq!(err.cursor(), Some(0));
    }

    #[test]
    fn examples_parse_cleanly() {
        for example in ArgumentType::examples(&double()) {
            assert!(parse(double(), &example).is_ok(), "{example}");
        }
        for example in ArgumentType::examples(&integer()) {
            assert!(parse(integer(), &example).is_ok(), "{example}");
        }
    }
}
