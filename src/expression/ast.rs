use crate::core::{Value, quote_ident};
use std::fmt;
use std::ops;

/// SQL expression node
///
/// Nodes compose into larger predicates and render to SQL text with `?`
/// placeholders; [`Expr::Param`] values are collected in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference
    Column(String),

    /// Compound identifier (e.g. table.column)
    CompoundIdentifier(Vec<String>),

    /// Literal value, inlined into the SQL text
    Literal(Value),

    /// Bound parameter
    Param(Value),

    /// Function call
    Function { name: String, args: Vec<Expr> },

    /// Binary operation (a = b, a AND b, etc.)
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// IS NULL check
    IsNull { expr: Box<Expr>, negated: bool },

    Not { expr: Box<Expr> },

    /// CASE WHEN .. THEN .. ELSE .. END
    Case {
        when: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

/// Rendered SQL plus its bound parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlFragment {
    /// Parameters in the shape `rusqlite` binds
    pub fn bound_params(&self) -> rusqlite::ParamsFromIter<std::slice::Iter<'_, Value>> {
        rusqlite::params_from_iter(self.params.iter())
    }
}

impl Expr {
    pub fn col(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::CompoundIdentifier(vec![table.into(), column.into()])
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn param(value: impl Into<Value>) -> Self {
        Expr::Param(value.into())
    }

    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function {
            name: name.into(),
            args,
        }
    }

    pub fn case(when: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Case {
            when: Box::new(when),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    fn binary(self, op: BinaryOp, right: impl Into<Expr>) -> Self {
        Expr::BinaryOp {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    pub fn eq(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    pub fn ne(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::NotEq, right)
    }

    pub fn lt(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Lt, right)
    }

    pub fn lte(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::LtEq, right)
    }

    pub fn gt(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Gt, right)
    }

    pub fn gte(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::GtEq, right)
    }

    pub fn and(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::And, right)
    }

    pub fn or(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    pub fn is_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    /// Wrap this expression as the single argument of `name(...)`
    pub fn wrap(self, name: impl Into<String>) -> Self {
        Expr::func(name, vec![self])
    }

    /// Render to SQL with `?` placeholders
    pub fn to_sql(&self) -> SqlFragment {
        let mut fragment = SqlFragment::default();
        self.write_sql(&mut fragment);
        fragment
    }

    fn write_sql(&self, out: &mut SqlFragment) {
        match self {
            Expr::Column(name) => out.sql.push_str(&quote_ident(name)),

            Expr::CompoundIdentifier(parts) => {
                let quoted: Vec<String> = parts.iter().map(|p| quote_ident(p)).collect();
                out.sql.push_str(&quoted.join("."));
            }

            Expr::Literal(value) => out.sql.push_str(&value.to_string()),

            Expr::Param(value) => {
                out.sql.push('?');
                out.params.push(value.clone());
            }

            Expr::Function { name, args } => {
                out.sql.push_str(name);
                out.sql.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.sql.push_str(", ");
                    }
                    arg.write_sql(out);
                }
                out.sql.push(')');
            }

            Expr::BinaryOp { left, op, right } => {
                out.sql.push('(');
                left.write_sql(out);
                out.sql.push_str(&format!(" {} ", op));
                right.write_sql(out);
                out.sql.push(')');
            }

            Expr::IsNull { expr, negated } => {
                expr.write_sql(out);
                out.sql
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }

            Expr::Not { expr } => {
                out.sql.push_str("NOT (");
                expr.write_sql(out);
                out.sql.push(')');
            }

            Expr::Case {
                when,
                then,
                otherwise,
            } => {
                out.sql.push_str("CASE WHEN ");
                when.write_sql(out);
                out.sql.push_str(" THEN ");
                then.write_sql(out);
                out.sql.push_str(" ELSE ");
                otherwise.write_sql(out);
                out.sql.push_str(" END");
            }
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Param(value)
    }
}

impl ops::BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        self.and(rhs)
    }
}

impl ops::BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        self.or(rhs)
    }
}

impl ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not {
            expr: Box::new(self),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql().sql)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Eq => write!(f, "="),
            BinaryOp::NotEq => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::LtEq => write!(f, "<="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::GtEq => write!(f, ">="),
            BinaryOp::And => write!(f, "AND"),
            BinaryOp::Or => write!(f, "OR"),
        }
    }
}
