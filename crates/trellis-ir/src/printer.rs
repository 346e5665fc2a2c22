//! Textual form of IR trees.
//!
//! Prints expressions as s-expressions, one node per parenthesised form.
//! Used for logging and snapshot tests; there is no parser for it.
//!
//! # Example output
//!
//! ```text
//! (let ((s (set 1 2)))
//!   ...)
//! (not (set.in x s))
//! (call (fn (x) x) 5)
//! ```

use std::fmt::{self, Display, Write};

use crate::{Expr, Literal, Program};

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Unit => f.write_str("()"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Real(r) => write!(f, "{r}r"),
            Literal::Char(c) => write!(f, "{c:?}"),
            Literal::BitVector { width, magnitude } => write!(f, "{magnitude}bv{width}"),
            Literal::Ordinal(n) => write!(f, "{n}ord"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name) => f.write_str(name),
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::Abs { params, body } => {
                f.write_str("(fn (")?;
                write_separated(f, params.as_slice())?;
                write!(f, ") {body})")
            }
            Expr::Apply { op, args } => {
                write!(f, "({}", op.mnemonic())?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_char(')')
            }
            Expr::Block(items) => {
                f.write_str("(block")?;
                for item in items {
                    write!(f, " {item}")?;
                }
                f.write_char(')')
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "(if {cond} {then_branch} {else_branch})"),
            Expr::Bind { vars, vals, body } => {
                f.write_str("(let (")?;
                for (i, (var, val)) in vars.iter().zip(vals).enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    write!(f, "({var} {val})")?;
                }
                write!(f, ") {body})")
            }
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(program {})", self.body)
    }
}

/// Print an expression to a string.
pub fn print_expr(expr: &Expr) -> String {
    expr.to_string()
}

fn write_separated(f: &mut fmt::Formatter<'_>, items: &[impl Display]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
