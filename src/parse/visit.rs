use crate::parse::ast;

pub trait AstVisitor {
    type Output;

    fn visit_literal(&mut self, x: &ast::Literal) -> Self::Output;

    fn visit_dice(&mut self, dice: &ast::DiceTerm) -> Self::Output;
}

pub trait Accept<V: AstVisitor + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<V: AstVisitor + ?Sized> Accept<V> for ast::Term {
    fn accept(&self, v: &mut V) -> V::Output {
        match self {
            Self::Dice(x) => v.visit_dice(x),
            Self::Literal(x) => v.visit_literal(x),
        }
    }
}

impl<V: AstVisitor + ?Sized> Accept<V> for ast::DiceTerm {
    fn accept(&self, v: &mut V) -> V::Output {
        v.visit_dice(self)
    }
}

impl<V: AstVisitor + ?Sized> Accept<V> for ast::Literal {
    fn accept(&self, v: &mut V) -> V::Output {
        v.visit_literal(self)
    }
}
