//! Keypad calculator
//!
//! A state machine driven by key presses, the way a pocket calculator is:
//! digits build up the display, a binary operator stores the display as
//! the left operand, and the next operator (or `=`) evaluates the pending
//! operation and chains the result.
//!
//! Two flavours share the machine. They differ in what division by zero
//! yields and in how much history they keep.

use crate::error::CalcError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Basic,
    Scientific,
}

impl Flavor {
    pub fn history_limit(&self) -> usize {
        match self {
            Flavor::Basic => 5,
            Flavor::Scientific => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AngleMode {
    #[default]
    Deg,
    Rad,
    Grad,
}

impl AngleMode {
    fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleMode::Deg => value * PI / 180.0,
            AngleMode::Rad => value,
            AngleMode::Grad => value * PI / 200.0,
        }
    }

    fn from_radians(self, value: f64) -> f64 {
        match self {
            AngleMode::Deg => value * 180.0 / PI,
            AngleMode::Rad => value,
            AngleMode::Grad => value * 200.0 / PI,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
    /// Pending after `=`; evaluates to the right operand
    Equals,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Power => "^",
            Operator::Modulo => "mod",
            Operator::Equals => "=",
        }
    }

    fn apply(&self, flavor: Flavor, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide if right == 0.0 => match flavor {
                Flavor::Basic => left,
                Flavor::Scientific => 0.0,
            },
            Operator::Divide => left / right,
            Operator::Power => left.powf(right),
            Operator::Modulo => left % right,
            Operator::Equals => right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Log,
    Ln,
    Exp,
    Sqrt,
    Cbrt,
    Square,
    Cube,
    Reciprocal,
    Factorial,
    Abs,
    Floor,
    Ceil,
    Round,
    Negate,
    Percent,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Log => "log",
            Function::Ln => "ln",
            Function::Exp => "exp",
            Function::Sqrt => "sqrt",
            Function::Cbrt => "cbrt",
            Function::Square => "square",
            Function::Cube => "cube",
            Function::Reciprocal => "reciprocal",
            Function::Factorial => "factorial",
            Function::Abs => "abs",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Round => "round",
            Function::Negate => "negate",
            Function::Percent => "percent",
        }
    }

    fn apply(&self, angle: AngleMode, x: f64) -> f64 {
        match self {
            Function::Sin => angle.to_radians(x).sin(),
            Function::Cos => angle.to_radians(x).cos(),
            Function::Tan => angle.to_radians(x).tan(),
            Function::Asin => angle.from_radians(x.asin()),
            Function::Acos => angle.from_radians(x.acos()),
            Function::Atan => angle.from_radians(x.atan()),
            Function::Log => x.log10(),
            Function::Ln => x.ln(),
            Function::Exp => x.exp(),
            Function::Sqrt => x.sqrt(),
            Function::Cbrt => x.cbrt(),
            Function::Square => x * x,
            Function::Cube => x * x * x,
            Function::Reciprocal if x == 0.0 => 0.0,
            Function::Reciprocal => 1.0 / x,
            Function::Factorial => factorial(x),
            Function::Abs => x.abs(),
            Function::Floor => x.floor(),
            Function::Ceil => x.ceil(),
            // Halves round up, as on most calculators: -2.5 -> -2
            Function::Round => (x + 0.5).floor(),
            Function::Negate => -x,
            Function::Percent => x / 100.0,
        }
    }
}

/// n! for non-negative integers; NaN otherwise, infinity past 170!
pub fn factorial(n: f64) -> f64 {
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return f64::NAN;
    }
    if n > 170.0 {
        return f64::INFINITY;
    }
    (2..=n as u32).fold(1.0, |acc, i| acc * f64::from(i))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => PI,
            Constant::E => E,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryKey {
    Store,
    Recall,
    Clear,
    Add,
    Subtract,
}

/// One key on the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Decimal,
    Operator(Operator),
    Function(Function),
    Constant(Constant),
    Memory(MemoryKey),
    Clear,
    ClearEntry,
    Backspace,
}

impl FromStr for Key {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "." => Key::Decimal,
            "+" => Key::Operator(Operator::Add),
            "-" => Key::Operator(Operator::Subtract),
            "*" | "×" | "x" => Key::Operator(Operator::Multiply),
            "/" | "÷" => Key::Operator(Operator::Divide),
            "^" => Key::Operator(Operator::Power),
            "mod" => Key::Operator(Operator::Modulo),
            "=" => Key::Operator(Operator::Equals),
            "pi" | "π" => Key::Constant(Constant::Pi),
            "e" => Key::Constant(Constant::E),
            "ms" => Key::Memory(MemoryKey::Store),
            "mr" => Key::Memory(MemoryKey::Recall),
            "mc" => Key::Memory(MemoryKey::Clear),
            "m+" => Key::Memory(MemoryKey::Add),
            "m-" => Key::Memory(MemoryKey::Subtract),
            "c" | "C" => Key::Clear,
            "ce" | "CE" => Key::ClearEntry,
            "del" | "⌫" => Key::Backspace,
            "%" => Key::Function(Function::Percent),
            "±" | "neg" => Key::Function(Function::Negate),
            "!" => Key::Function(Function::Factorial),
            other => {
                if let [digit @ b'0'..=b'9'] = other.as_bytes() {
                    return Ok(Key::Digit(digit - b'0'));
                }
                return ALL_FUNCTIONS
                    .iter()
                    .find(|f| f.name() == other)
                    .map(|&f| Key::Function(f))
                    .ok_or_else(|| CalcError::UnknownKey(other.to_string()));
            }
        };
        Ok(key)
    }
}

const ALL_FUNCTIONS: [Function; 21] = [
    Function::Sin,
    Function::Cos,
    Function::Tan,
    Function::Asin,
    Function::Acos,
    Function::Atan,
    Function::Log,
    Function::Ln,
    Function::Exp,
    Function::Sqrt,
    Function::Cbrt,
    Function::Square,
    Function::Cube,
    Function::Reciprocal,
    Function::Factorial,
    Function::Abs,
    Function::Floor,
    Function::Ceil,
    Function::Round,
    Function::Negate,
    Function::Percent,
];

/// Display text for a number: integers without a fraction, exponent form
/// for very large or very small magnitudes (`1e+21`, `1e-7`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

#[derive(Debug, Clone)]
pub struct Calculator {
    flavor: Flavor,
    display: String,
    previous: Option<f64>,
    pending: Option<Operator>,
    waiting_for_operand: bool,
    memory: f64,
    angle_mode: AngleMode,
    /// Newest first
    history: VecDeque<String>,
}

impl Calculator {
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            display: "0".to_string(),
            previous: None,
            pending: None,
            waiting_for_operand: false,
            memory: 0.0,
            angle_mode: AngleMode::default(),
            history: VecDeque::new(),
        }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// The display as a number; a lone "." or "-" reads as 0
    pub fn value(&self) -> f64 {
        self.display.parse().unwrap_or(0.0)
    }

    /// The left operand and operator waiting for a right operand, e.g. "12 +"
    pub fn pending_expression(&self) -> Option<String> {
        match (self.previous, self.pending) {
            (Some(previous), Some(op)) => Some(format!("{} {}", format_number(previous), op.symbol())),
            _ => None,
        }
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.angle_mode = mode;
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn press(&mut self, key: Key) -> Result<(), CalcError> {
        match key {
            Key::Digit(digit) => self.input_digit(digit),
            Key::Decimal => self.input_decimal(),
            Key::Operator(op) => return self.apply_operator(op),
            Key::Function(function) => return self.apply_function(function).map(|_| ()),
            Key::Constant(constant) => self.insert_constant(constant),
            Key::Memory(memory) => self.memory_key(memory),
            Key::Clear => self.clear(),
            Key::ClearEntry => self.clear_entry(),
            Key::Backspace => self.delete_last(),
        }
        Ok(())
    }

    /// Press a whitespace-separated key sequence such as `"12.5 × 4 ="`.
    /// Numbers are entered digit by digit. Stops at the first error.
    pub fn press_sequence(&mut self, input: &str) -> Result<(), CalcError> {
        for token in input.split_whitespace() {
            let is_number = token.len() > 1
                && token.chars().all(|c| c.is_ascii_digit() || c == '.');
            if is_number {
                for c in token.chars() {
                    self.press(c.to_string().parse()?)?;
                }
            } else {
                self.press(token.parse()?)?;
            }
        }
        Ok(())
    }

    pub fn input_digit(&mut self, digit: u8) {
        let digit = char::from(b'0' + digit.min(9));
        if self.waiting_for_operand {
            self.display = digit.to_string();
            self.waiting_for_operand = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    pub fn input_decimal(&mut self) {
        if self.waiting_for_operand {
            self.display = "0.".to_string();
            self.waiting_for_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Reset everything except memory, angle mode and history
    pub fn clear(&mut self) {
        self.display = "0".to_string();
        self.previous = None;
        self.pending = None;
        self.waiting_for_operand = false;
    }

    pub fn clear_entry(&mut self) {
        self.display = "0".to_string();
    }

    pub fn delete_last(&mut self) {
        self.display.pop();
        if self.display.is_empty() || self.display == "-" {
            self.display = "0".to_string();
        }
    }

    /// Press a binary operator (or `=`).
    ///
    /// The pending operation, if any, is evaluated first and its result
    /// becomes the new left operand. Pressing a second operator before any
    /// digit only replaces the pending one.
    pub fn apply_operator(&mut self, next: Operator) -> Result<(), CalcError> {
        let input = self.value();

        let outcome = match (self.previous, self.pending) {
            (Some(_), Some(_)) if self.waiting_for_operand && next != Operator::Equals => Ok(()),
            (Some(left), Some(op)) => self.evaluate(left, op, input),
            _ => {
                self.previous = Some(input);
                Ok(())
            }
        };

        self.waiting_for_operand = true;
        self.pending = Some(next);
        outcome
    }

    pub fn equals(&mut self) -> Result<(), CalcError> {
        self.apply_operator(Operator::Equals)
    }

    fn evaluate(&mut self, left: f64, op: Operator, right: f64) -> Result<(), CalcError> {
        let result = op.apply(self.flavor, left, right);

        if !result.is_finite() {
            self.show(0.0);
            self.previous = Some(0.0);
            tracing::debug!(left, op = op.symbol(), right, "invalid calculation");
            return Err(CalcError::InvalidCalculation(format!(
                "{} {} {}",
                format_number(left),
                op.symbol(),
                format_number(right)
            )));
        }

        self.show(result);
        self.previous = Some(result);
        if op != Operator::Equals {
            self.record(format!(
                "{} {} {} = {}",
                format_number(left),
                op.symbol(),
                format_number(right),
                format_number(result)
            ));
        }
        Ok(())
    }

    /// Apply a unary function to the display.
    ///
    /// A non-finite result shows 0 and is reported as
    /// [`CalcError::InvalidCalculation`].
    pub fn apply_function(&mut self, function: Function) -> Result<f64, CalcError> {
        let input = self.value();
        let result = function.apply(self.angle_mode, input);

        if !result.is_finite() {
            self.show(0.0);
            self.waiting_for_operand = true;
            return Err(CalcError::InvalidCalculation(format!(
                "{}({})",
                function.name(),
                format_number(input)
            )));
        }

        self.show(result);
        self.waiting_for_operand = true;
        self.record(format!(
            "{}({}) = {}",
            function.name(),
            format_number(input),
            format_number(result)
        ));
        Ok(result)
    }

    pub fn insert_constant(&mut self, constant: Constant) {
        self.show(constant.value());
        self.waiting_for_operand = true;
    }

    pub fn memory_key(&mut self, key: MemoryKey) {
        match key {
            MemoryKey::Store => self.memory = self.value(),
            MemoryKey::Recall => {
                self.show(self.memory);
                self.waiting_for_operand = true;
            }
            MemoryKey::Clear => self.memory = 0.0,
            MemoryKey::Add => self.update_memory(self.memory + self.value()),
            MemoryKey::Subtract => self.update_memory(self.memory - self.value()),
        }
    }

    /// Memory only ever holds finite values; an overflowing update is dropped
    fn update_memory(&mut self, value: f64) {
        if value.is_finite() {
            self.memory = value;
        }
    }

    fn show(&mut self, value: f64) {
        self.display = format_number(value);
    }

    fn record(&mut self, entry: String) {
        self.history.push_front(entry);
        self.history.truncate(self.flavor.history_limit());
    }
}

impl fmt::Display for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
