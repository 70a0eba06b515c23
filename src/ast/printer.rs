//! Indented tree dump of a parsed program, used by `--pass-debug parse`.

use std::fmt::{self, Display, Write};

use super::ast::{ExprId, ExprKind, Program, Prototype};

const INDENT: &str = "  ";

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for extern_def in &self.externs {
            writeln!(f, "ExternNode:")?;
            write_prototype(f, &extern_def.prototype, 1)?;
        }

        for function in &self.functions {
            writeln!(f, "FunctionNode:")?;
            write_prototype(f, &function.prototype, 1)?;
            write_expr(f, self, function.body, 1)?;
        }

        Ok(())
    }
}

fn write_prototype(f: &mut impl Write, prototype: &Prototype, depth: usize) -> fmt::Result {
    writeln!(
        f,
        "{}Prototype: '{}' (ret ty: {})",
        INDENT.repeat(depth),
        prototype.name,
        prototype.return_type
    )?;

    for arg in &prototype.args {
        writeln!(
            f,
            "{}PrototypeArg: '{}' (ty: {})",
            INDENT.repeat(depth + 1),
            arg.name,
            arg.type_
        )?;
    }

    Ok(())
}

fn write_expr(f: &mut impl Write, program: &Program, id: ExprId, depth: usize) -> fmt::Result {
    let indent = INDENT.repeat(depth);

    match program.ast.kind(id) {
        ExprKind::Binary { operator, lhs, rhs } => {
            writeln!(f, "{}BinaryNode: '{}'", indent, operator)?;
            write_expr(f, program, *lhs, depth + 1)?;
            write_expr(f, program, *rhs, depth + 1)
        }
        ExprKind::Unary { operator, operand } => {
            writeln!(f, "{}UnaryNode: '{}'", indent, operator)?;
            write_expr(f, program, *operand, depth + 1)
        }
        ExprKind::If {
            condition,
            then_block,
            else_block,
        } => {
            writeln!(f, "{}IfNode:", indent)?;
            write_expr(f, program, *condition, depth + 1)?;
            write_expr(f, program, *then_block, depth + 1)?;
            if let Some(else_block) = else_block {
                write_expr(f, program, *else_block, depth + 1)?;
            }
            Ok(())
        }
        ExprKind::Let {
            name,
            annotation,
            value,
        } => {
            match annotation {
                Some(annotation) => {
                    writeln!(f, "{}LetNode: '{}' (ty annot: {})", indent, name, annotation)?
                }
                None => writeln!(f, "{}LetNode: '{}'", indent, name)?,
            }
            write_expr(f, program, *value, depth + 1)
        }
        ExprKind::Block { statements } => {
            writeln!(f, "{}BlockNode:", indent)?;
            for statement in statements {
                write_expr(f, program, *statement, depth + 1)?;
            }
            Ok(())
        }
        ExprKind::SingleOp { operator, value } => {
            writeln!(f, "{}SingleOpNode: '{}'", indent, operator)?;
            match value {
                Some(value) => write_expr(f, program, *value, depth + 1),
                None => Ok(()),
            }
        }
        ExprKind::Call { callee, arguments } => {
            writeln!(f, "{}CallNode: '{}'", indent, callee)?;
            for argument in arguments {
                write_expr(f, program, *argument, depth + 1)?;
            }
            Ok(())
        }
        ExprKind::Variable { name } => writeln!(f, "{}VariableNode: '{}'", indent, name),
        ExprKind::Subscript { operand, index } => {
            writeln!(f, "{}SubscriptNode:", indent)?;
            write_expr(f, program, *operand, depth + 1)?;
            write_expr(f, program, *index, depth + 1)
        }
        ExprKind::Boolean { value } => writeln!(f, "{}BooleanNode: '{}'", indent, value),
        ExprKind::Number { value, .. } => writeln!(f, "{}NumberNode: '{}'", indent, value),
        ExprKind::String { value } => writeln!(f, "{}StringNode: \"{}\"", indent, value),
        ExprKind::Char { value } => writeln!(f, "{}CharNode: '{}'", indent, value),
    }
}
