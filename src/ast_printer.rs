use crate::ast::{Expr, Stmt, SyntaxTree};
use crate::token::TokenType;

/// Renders trees as parenthesised prefix notation, e.g. `(+ 1.0 (* 2.0 3.0))`.
pub struct Ast;

impl Ast {
    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Binary(left, op, right) => {
                format!("({} {} {})", op.lexeme, self.print(left), self.print(right))
            }

            Expr::Unary(op, operand) => format!("({} {})", op.lexeme, self.print(operand)),

            Expr::Literal(token) => match (&token.token_type, token.literal()) {
                (TokenType::STRING(s), _) => format!("\"{}\"", s),

                (_, Some(literal)) => literal.to_string(),

                // identifiers and `return`
                (_, None) => token.lexeme.to_string(),
            },

            Expr::Grouping(inner) => format!("(group {})", self.print(inner)),

            Expr::Assign(name, value) => format!("(= {} {})", name.lexeme, self.print(value)),

            Expr::Empty => "<empty>".to_string(),

            Expr::Error(error) => format!("(error {:?})", error.message),
        }
    }

    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(expr {})", self.print(expr)),

            Stmt::Print(expr) => format!("(print {})", self.print(expr)),

            Stmt::VarDecl(kind, name, Expr::Empty) => {
                format!("({} {})", kind.keyword(), name.lexeme)
            }

            Stmt::VarDecl(kind, name, initializer) => format!(
                "({} {} {})",
                kind.keyword(),
                name.lexeme,
                self.print(initializer)
            ),

            Stmt::Block(statements) => {
                let mut out = String::from("(block");
                for stmt in statements {
                    out.push(' ');
                    out.push_str(&self.print_stmt(stmt));
                }
                out.push(')');
                out
            }

            Stmt::If(condition, then_branch, None) => format!(
                "(if {} {})",
                self.print(condition),
                self.print_stmt(then_branch)
            ),

            Stmt::If(condition, then_branch, Some(else_branch)) => format!(
                "(if {} {} {})",
                self.print(condition),
                self.print_stmt(then_branch),
                self.print_stmt(else_branch)
            ),

            Stmt::While(condition, body) => {
                format!("(while {} {})", self.print(condition), self.print_stmt(body))
            }

            Stmt::Error(error) => format!("(error {:?})", error.message),
        }
    }

    /// One top‑level statement per line.
    pub fn print_tree(&self, tree: &SyntaxTree) -> String {
        tree.statements()
            .iter()
            .map(|stmt| self.print_stmt(stmt))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn lit(token_type: TokenType, lexeme: &'static str) -> Expr<'static> {
        Expr::Literal(Token::new(token_type, lexeme, 1))
    }

    #[test]
    fn prints_literals() {
        let printer = Ast;

        assert_eq!(printer.print(&lit(TokenType::NUMBER(3.0), "3")), "3.0");
        assert_eq!(printer.print(&lit(TokenType::NUMBER(2.5), "2.5")), "2.5");
        assert_eq!(
            printer.print(&lit(TokenType::STRING("hi".into()), "\"hi\"")),
            "\"hi\""
        );
        assert_eq!(printer.print(&lit(TokenType::NIL, "nil")), "nil");
        assert_eq!(printer.print(&lit(TokenType::FALSE, "false")), "false");
        assert_eq!(printer.print(&lit(TokenType::IDENTIFIER, "answer")), "answer");
        assert_eq!(printer.print(&lit(TokenType::RETURN, "return")), "return");
    }

    #[test]
    fn prints_nested_statements() {
        let printer = Ast;
        let stmt = Stmt::While(
            lit(TokenType::TRUE, "true"),
            Box::new(Stmt::Block(vec![
                Stmt::Print(Expr::Unary(
                    Token::new(TokenType::MINUS, "-", 1),
                    Box::new(lit(TokenType::IDENTIFIER, "x")),
                )),
                Stmt::VarDecl(
                    crate::ast::DeclKind::Const,
                    Token::new(TokenType::IDENTIFIER, "y", 1),
                    Expr::Empty,
                ),
            ])),
        );

        assert_eq!(
            printer.print_stmt(&stmt),
            "(while true (block (print (- x)) (const y)))"
        );
    }
}
