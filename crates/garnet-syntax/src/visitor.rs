//! Visitor dispatch over the syntax tree.
//!
//! A consumer implements [`Visitor`] once, with one method per node variant,
//! and calls [`Node::accept`](crate::ast::Node::accept) on any node to run the
//! method matching that node's variant. None of the methods have defaults, so
//! a visitor that misses a variant does not compile.
//!
//! Visitors that can fail use a `Result` as their output; dispatch itself
//! never fails and passes the method's result through unchanged.
//!
//! The formatter in `garnet-fmt` is the reference consumer.

use crate::ast::*;

/// One operation per node variant, producing `Self::Output`.
pub trait Visitor {
    type Output;

    fn visit_root(&mut self, node: &RootNode) -> Self::Output;
    fn visit_block(&mut self, node: &BlockNode) -> Self::Output;

    // literals
    fn visit_nil(&mut self, node: &NilNode) -> Self::Output;
    fn visit_true(&mut self, node: &TrueNode) -> Self::Output;
    fn visit_false(&mut self, node: &FalseNode) -> Self::Output;
    fn visit_self(&mut self, node: &SelfNode) -> Self::Output;
    fn visit_fixnum(&mut self, node: &FixnumNode) -> Self::Output;
    fn visit_float(&mut self, node: &FloatNode) -> Self::Output;
    fn visit_str(&mut self, node: &StrNode) -> Self::Output;
    fn visit_symbol(&mut self, node: &SymbolNode) -> Self::Output;
    fn visit_array(&mut self, node: &ArrayNode) -> Self::Output;
    fn visit_list(&mut self, node: &ListNode) -> Self::Output;

    // variables
    fn visit_local_var(&mut self, node: &LocalVarNode) -> Self::Output;
    fn visit_local_asgn(&mut self, node: &LocalAsgnNode) -> Self::Output;
    fn visit_inst_var(&mut self, node: &InstVarNode) -> Self::Output;
    fn visit_inst_asgn(&mut self, node: &InstAsgnNode) -> Self::Output;
    fn visit_global_var(&mut self, node: &GlobalVarNode) -> Self::Output;
    fn visit_global_asgn(&mut self, node: &GlobalAsgnNode) -> Self::Output;
    fn visit_class_var(&mut self, node: &ClassVarNode) -> Self::Output;
    fn visit_class_var_asgn(&mut self, node: &ClassVarAsgnNode) -> Self::Output;
    fn visit_multiple_asgn(&mut self, node: &MultipleAsgnNode) -> Self::Output;

    // constants
    fn visit_const(&mut self, node: &ConstNode) -> Self::Output;
    fn visit_colon2(&mut self, node: &Colon2Node) -> Self::Output;
    fn visit_colon3(&mut self, node: &Colon3Node) -> Self::Output;
    fn visit_const_decl(&mut self, node: &ConstDeclNode) -> Self::Output;

    // calls
    fn visit_call(&mut self, node: &CallNode) -> Self::Output;
    fn visit_fcall(&mut self, node: &FCallNode) -> Self::Output;
    fn visit_vcall(&mut self, node: &VCallNode) -> Self::Output;
    fn visit_attr_assign(&mut self, node: &AttrAssignNode) -> Self::Output;
    fn visit_yield(&mut self, node: &YieldNode) -> Self::Output;

    // control flow
    fn visit_not(&mut self, node: &NotNode) -> Self::Output;
    fn visit_and(&mut self, node: &AndNode) -> Self::Output;
    fn visit_or(&mut self, node: &OrNode) -> Self::Output;
    fn visit_if(&mut self, node: &IfNode) -> Self::Output;
    fn visit_while(&mut self, node: &WhileNode) -> Self::Output;
    fn visit_until(&mut self, node: &UntilNode) -> Self::Output;
    fn visit_return(&mut self, node: &ReturnNode) -> Self::Output;

    // definitions
    fn visit_def(&mut self, node: &DefNode) -> Self::Output;
    fn visit_args(&mut self, node: &ArgsNode) -> Self::Output;
    fn visit_class(&mut self, node: &ClassNode) -> Self::Output;
    fn visit_module(&mut self, node: &ModuleNode) -> Self::Output;
}
