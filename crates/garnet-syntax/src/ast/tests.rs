use std::collections::HashSet;

use super::*;
use crate::visitor::Visitor;
use test_case::test_case;

fn sp() -> Span {
    Span::new(0, 1, 1)
}

fn int(value: i64) -> Node {
    FixnumNode::new(sp(), value).into()
}

fn vcall(name: &str) -> Node {
    VCallNode::new(sp(), name).into()
}

fn list(items: Vec<Node>) -> ListNode {
    ListNode::new(sp(), items)
}

fn self_node() -> Node {
    SelfNode::new(sp()).into()
}

/// One instance of every variant, with optional children present.
fn samples() -> Vec<Node> {
    vec![
        RootNode::new(sp(), "t.rb", Some(int(1))).into(),
        BlockNode::new(sp(), vec![int(1), int(2)]).into(),
        NilNode::new(sp()).into(),
        TrueNode::new(sp()).into(),
        FalseNode::new(sp()).into(),
        self_node(),
        int(1),
        FloatNode::new(sp(), 1.5).into(),
        StrNode::new(sp(), "s").into(),
        SymbolNode::new(sp(), "sym").into(),
        ArrayNode::new(sp(), vec![int(1)]).into(),
        list(vec![int(1)]).into(),
        LocalVarNode::new(sp(), "a").into(),
        LocalAsgnNode::new(sp(), "a", int(1)).into(),
        InstVarNode::new(sp(), "@a").into(),
        InstAsgnNode::new(sp(), "@a", int(1)).into(),
        GlobalVarNode::new(sp(), "$a").into(),
        GlobalAsgnNode::new(sp(), "$a", int(1)).into(),
        ClassVarNode::new(sp(), "@@a").into(),
        ClassVarAsgnNode::new(sp(), "@@a", int(1)).into(),
        MultipleAsgnNode::new(sp(), vec![LocalVarNode::new(sp(), "a").into()], int(1)).into(),
        ConstNode::new(sp(), "Foo").into(),
        Colon2Node::new(sp(), ConstNode::new(sp(), "Foo").into(), "Bar").into(),
        Colon3Node::new(sp(), "Foo").into(),
        ConstDeclNode::new(sp(), Some("FOO".into()), None, int(1))
            .unwrap()
            .into(),
        CallNode::new(sp(), vcall("a"), "b", Some(list(vec![int(1)])), false).into(),
        FCallNode::new(sp(), "p", Some(list(vec![int(1)]))).into(),
        vcall("a"),
        AttrAssignNode::new(sp(), vcall("a"), "b=", Some(list(vec![int(1)])), false).into(),
        NotNode::new(sp(), int(1)).into(),
        AndNode::new(sp(), int(1), int(2)).into(),
        OrNode::new(sp(), int(1), int(2)).into(),
        IfNode::new(sp(), int(1), Some(int(2)), Some(int(3))).into(),
        WhileNode::new(sp(), int(1), Some(int(2))).into(),
        UntilNode::new(sp(), int(1), Some(int(2))).into(),
        ReturnNode::new(sp(), Some(int(1))).into(),
        YieldNode::new(sp(), Some(list(vec![int(1)]))).into(),
        DefNode::new(sp(), "m", ArgsNode::new(sp(), vec!["a".into()], Vec::new(), None), Some(int(1)))
            .into(),
        ArgsNode::new(sp(), vec!["a".into()], vec![LocalAsgnNode::new(sp(), "b", int(1)).into()], None)
            .into(),
        ClassNode::new(sp(), ConstNode::new(sp(), "C").into(), Some(ConstNode::new(sp(), "S").into()), Some(int(1)))
            .into(),
        ModuleNode::new(sp(), ConstNode::new(sp(), "M").into(), Some(int(1))).into(),
    ]
}

/// Answers every visit with the tag of the variant it was called for.
struct TagMarker;

impl Visitor for TagMarker {
    type Output = NodeType;

    fn visit_root(&mut self, _: &RootNode) -> NodeType {
        NodeType::Root
    }
    fn visit_block(&mut self, _: &BlockNode) -> NodeType {
        NodeType::Block
    }
    fn visit_nil(&mut self, _: &NilNode) -> NodeType {
        NodeType::Nil
    }
    fn visit_true(&mut self, _: &TrueNode) -> NodeType {
        NodeType::True
    }
    fn visit_false(&mut self, _: &FalseNode) -> NodeType {
        NodeType::False
    }
    fn visit_self(&mut self, _: &SelfNode) -> NodeType {
        NodeType::SelfRef
    }
    fn visit_fixnum(&mut self, _: &FixnumNode) -> NodeType {
        NodeType::Fixnum
    }
    fn visit_float(&mut self, _: &FloatNode) -> NodeType {
        NodeType::Float
    }
    fn visit_str(&mut self, _: &StrNode) -> NodeType {
        NodeType::Str
    }
    fn visit_symbol(&mut self, _: &SymbolNode) -> NodeType {
        NodeType::Symbol
    }
    fn visit_array(&mut self, _: &ArrayNode) -> NodeType {
        NodeType::Array
    }
    fn visit_list(&mut self, _: &ListNode) -> NodeType {
        NodeType::List
    }
    fn visit_local_var(&mut self, _: &LocalVarNode) -> NodeType {
        NodeType::LocalVar
    }
    fn visit_local_asgn(&mut self, _: &LocalAsgnNode) -> NodeType {
        NodeType::LocalAsgn
    }
    fn visit_inst_var(&mut self, _: &InstVarNode) -> NodeType {
        NodeType::InstVar
    }
    fn visit_inst_asgn(&mut self, _: &InstAsgnNode) -> NodeType {
        NodeType::InstAsgn
    }
    fn visit_global_var(&mut self, _: &GlobalVarNode) -> NodeType {
        NodeType::GlobalVar
    }
    fn visit_global_asgn(&mut self, _: &GlobalAsgnNode) -> NodeType {
        NodeType::GlobalAsgn
    }
    fn visit_class_var(&mut self, _: &ClassVarNode) -> NodeType {
        NodeType::ClassVar
    }
    fn visit_class_var_asgn(&mut self, _: &ClassVarAsgnNode) -> NodeType {
        NodeType::ClassVarAsgn
    }
    fn visit_multiple_asgn(&mut self, _: &MultipleAsgnNode) -> NodeType {
        NodeType::MultipleAsgn
    }
    fn visit_const(&mut self, _: &ConstNode) -> NodeType {
        NodeType::Const
    }
    fn visit_colon2(&mut self, _: &Colon2Node) -> NodeType {
        NodeType::Colon2
    }
    fn visit_colon3(&mut self, _: &Colon3Node) -> NodeType {
        NodeType::Colon3
    }
    fn visit_const_decl(&mut self, _: &ConstDeclNode) -> NodeType {
        NodeType::ConstDecl
    }
    fn visit_call(&mut self, _: &CallNode) -> NodeType {
        NodeType::Call
    }
    fn visit_fcall(&mut self, _: &FCallNode) -> NodeType {
        NodeType::FCall
    }
    fn visit_vcall(&mut self, _: &VCallNode) -> NodeType {
        NodeType::VCall
    }
    fn visit_attr_assign(&mut self, _: &AttrAssignNode) -> NodeType {
        NodeType::AttrAssign
    }
    fn visit_yield(&mut self, _: &YieldNode) -> NodeType {
        NodeType::Yield
    }
    fn visit_not(&mut self, _: &NotNode) -> NodeType {
        NodeType::Not
    }
    fn visit_and(&mut self, _: &AndNode) -> NodeType {
        NodeType::And
    }
    fn visit_or(&mut self, _: &OrNode) -> NodeType {
        NodeType::Or
    }
    fn visit_if(&mut self, _: &IfNode) -> NodeType {
        NodeType::If
    }
    fn visit_while(&mut self, _: &WhileNode) -> NodeType {
        NodeType::While
    }
    fn visit_until(&mut self, _: &UntilNode) -> NodeType {
        NodeType::Until
    }
    fn visit_return(&mut self, _: &ReturnNode) -> NodeType {
        NodeType::Return
    }
    fn visit_def(&mut self, _: &DefNode) -> NodeType {
        NodeType::Def
    }
    fn visit_args(&mut self, _: &ArgsNode) -> NodeType {
        NodeType::Args
    }
    fn visit_class(&mut self, _: &ClassNode) -> NodeType {
        NodeType::Class
    }
    fn visit_module(&mut self, _: &ModuleNode) -> NodeType {
        NodeType::Module
    }
}

#[test]
fn samples_cover_every_variant() {
    let covered: HashSet<NodeType> = samples().iter().map(Node::node_type).collect();
    let all: HashSet<NodeType> = NodeType::ALL.iter().copied().collect();
    assert_eq!(covered, all);
}

#[test]
fn accept_dispatches_to_own_variant() {
    for node in samples() {
        assert_eq!(node.accept(&mut TagMarker), node.node_type());
    }
}

#[test]
fn tag_names_are_distinct() {
    let names: HashSet<&str> = NodeType::ALL.iter().map(|tag| tag.as_str()).collect();
    assert_eq!(names.len(), NodeType::ALL.len());
}

fn child_tags(node: &Node) -> Vec<NodeType> {
    node.child_nodes().into_iter().map(Node::node_type).collect()
}

/// Tag plus name or value, enough to tell sibling children apart.
fn label(node: &Node) -> String {
    match (node, node.name()) {
        (Node::Fixnum(n), _) => format!("Fixnum {}", n.value()),
        (_, Some(name)) => format!("{} {}", node.node_type().as_str(), name),
        (_, None) => node.node_type().as_str().to_string(),
    }
}

fn lvar(name: &str) -> Node {
    LocalVarNode::new(sp(), name).into()
}

fn opt_param(name: &str, value: i64) -> Node {
    LocalAsgnNode::new(sp(), name, int(value)).into()
}

fn no_params() -> ArgsNode {
    ArgsNode::new(sp(), Vec::new(), Vec::new(), None)
}

#[test_case(RootNode::new(sp(), "t.rb", Some(vcall("main"))).into(), &["VCall main"]; "root with body")]
#[test_case(RootNode::new(sp(), "t.rb", None).into(), &[]; "empty root")]
#[test_case(BlockNode::new(sp(), vec![int(1), vcall("b"), int(3)]).into(), &["Fixnum 1", "VCall b", "Fixnum 3"]; "block")]
#[test_case(ArrayNode::new(sp(), vec![vcall("a"), int(2)]).into(), &["VCall a", "Fixnum 2"]; "array")]
#[test_case(ArrayNode::new(sp(), Vec::new()).into(), &[]; "empty array")]
#[test_case(list(vec![int(1), vcall("b")]).into(), &["Fixnum 1", "VCall b"]; "list")]
#[test_case(NilNode::new(sp()).into(), &[]; "nil")]
#[test_case(TrueNode::new(sp()).into(), &[]; "true")]
#[test_case(FalseNode::new(sp()).into(), &[]; "false")]
#[test_case(self_node(), &[]; "self")]
#[test_case(int(7), &[]; "fixnum")]
#[test_case(FloatNode::new(sp(), 1.5).into(), &[]; "float")]
#[test_case(StrNode::new(sp(), "s").into(), &[]; "str")]
#[test_case(SymbolNode::new(sp(), "sym").into(), &[]; "symbol")]
#[test_case(lvar("a"), &[]; "local var")]
#[test_case(LocalAsgnNode::new(sp(), "a", vcall("v")).into(), &["VCall v"]; "local asgn")]
#[test_case(InstVarNode::new(sp(), "@a").into(), &[]; "inst var")]
#[test_case(InstAsgnNode::new(sp(), "@a", int(2)).into(), &["Fixnum 2"]; "inst asgn")]
#[test_case(GlobalVarNode::new(sp(), "$a").into(), &[]; "global var")]
#[test_case(GlobalAsgnNode::new(sp(), "$a", vcall("g")).into(), &["VCall g"]; "global asgn")]
#[test_case(ClassVarNode::new(sp(), "@@a").into(), &[]; "class var")]
#[test_case(ClassVarAsgnNode::new(sp(), "@@a", int(4)).into(), &["Fixnum 4"]; "class var asgn")]
#[test_case(
    MultipleAsgnNode::new(sp(), vec![lvar("a"), InstVarNode::new(sp(), "@b").into()], int(3)).into(),
    &["LocalVar a", "InstVar @b", "Fixnum 3"];
    "multiple asgn"
)]
#[test_case(ConstNode::new(sp(), "Foo").into(), &[]; "const")]
#[test_case(Colon2Node::new(sp(), ConstNode::new(sp(), "Foo").into(), "Bar").into(), &["Const Foo"]; "colon2")]
#[test_case(Colon3Node::new(sp(), "Foo").into(), &[]; "colon3")]
#[test_case(
    ConstDeclNode::new(sp(), None, Some(Colon3Node::new(sp(), "TOP").into()), int(1)).unwrap().into(),
    &["Colon3 TOP", "Fixnum 1"];
    "const decl with path"
)]
#[test_case(
    ConstDeclNode::new(sp(), Some("FOO".into()), None, int(1)).unwrap().into(),
    &["Fixnum 1"];
    "const decl with name"
)]
#[test_case(CallNode::new(sp(), vcall("a"), "b", Some(list(vec![int(1)])), false).into(), &["VCall a", "List"]; "call with args")]
#[test_case(CallNode::new(sp(), int(5), "b", None, true).into(), &["Fixnum 5"]; "call without args")]
#[test_case(FCallNode::new(sp(), "p", Some(list(vec![int(1)]))).into(), &["List"]; "fcall with args")]
#[test_case(FCallNode::new(sp(), "p", None).into(), &[]; "fcall without args")]
#[test_case(vcall("a"), &[]; "vcall")]
#[test_case(AttrAssignNode::new(sp(), self_node(), "b=", Some(list(vec![int(1)])), false).into(), &["SelfRef", "List"]; "attr assign with args")]
#[test_case(AttrAssignNode::new(sp(), vcall("a"), "b=", None, false).into(), &["VCall a"]; "attr assign without args")]
#[test_case(YieldNode::new(sp(), Some(list(vec![int(1)]))).into(), &["List"]; "yield with args")]
#[test_case(YieldNode::new(sp(), None).into(), &[]; "bare yield")]
#[test_case(NotNode::new(sp(), vcall("a")).into(), &["VCall a"]; "not")]
#[test_case(AndNode::new(sp(), int(1), vcall("b")).into(), &["Fixnum 1", "VCall b"]; "and")]
#[test_case(OrNode::new(sp(), vcall("a"), int(2)).into(), &["VCall a", "Fixnum 2"]; "or")]
#[test_case(IfNode::new(sp(), int(1), Some(vcall("t")), Some(vcall("e"))).into(), &["Fixnum 1", "VCall t", "VCall e"]; "if with both branches")]
#[test_case(IfNode::new(sp(), int(1), Some(vcall("t")), None).into(), &["Fixnum 1", "VCall t"]; "if without else")]
#[test_case(WhileNode::new(sp(), vcall("c"), Some(int(2))).into(), &["VCall c", "Fixnum 2"]; "while")]
#[test_case(WhileNode::new(sp(), vcall("c"), None).into(), &["VCall c"]; "empty while")]
#[test_case(UntilNode::new(sp(), int(1), Some(vcall("b"))).into(), &["Fixnum 1", "VCall b"]; "until")]
#[test_case(UntilNode::new(sp(), int(1), None).into(), &["Fixnum 1"]; "empty until")]
#[test_case(ReturnNode::new(sp(), Some(vcall("r"))).into(), &["VCall r"]; "return with value")]
#[test_case(ReturnNode::new(sp(), None).into(), &[]; "bare return")]
#[test_case(DefNode::new(sp(), "m", no_params(), Some(vcall("body"))).into(), &["Args", "VCall body"]; "def with body")]
#[test_case(DefNode::new(sp(), "m", no_params(), None).into(), &["Args"]; "empty def")]
#[test_case(
    ArgsNode::new(sp(), vec!["a".into()], vec![opt_param("b", 1), opt_param("c", 2)], Some("rest".into())).into(),
    &["LocalAsgn b", "LocalAsgn c"];
    "args with optionals"
)]
#[test_case(ArgsNode::new(sp(), vec!["a".into()], Vec::new(), None).into(), &[]; "args without optionals")]
#[test_case(
    ClassNode::new(sp(), ConstNode::new(sp(), "C").into(), Some(Colon3Node::new(sp(), "S").into()), Some(int(1))).into(),
    &["Const C", "Colon3 S", "Fixnum 1"];
    "class with superclass and body"
)]
#[test_case(ClassNode::new(sp(), ConstNode::new(sp(), "C").into(), None, None).into(), &["Const C"]; "bare class")]
#[test_case(ModuleNode::new(sp(), ConstNode::new(sp(), "M").into(), Some(vcall("x"))).into(), &["Const M", "VCall x"]; "module with body")]
#[test_case(ModuleNode::new(sp(), ConstNode::new(sp(), "M").into(), None).into(), &["Const M"]; "empty module")]
fn child_nodes_in_declared_order(node: Node, expected: &[&str]) {
    let labels: Vec<String> = node.child_nodes().into_iter().map(label).collect();
    assert_eq!(labels, expected);
}

#[test]
fn leaves_have_no_children() {
    for node in samples() {
        let leaf = matches!(
            node.node_type(),
            NodeType::Nil
                | NodeType::True
                | NodeType::False
                | NodeType::SelfRef
                | NodeType::Fixnum
                | NodeType::Float
                | NodeType::Str
                | NodeType::Symbol
                | NodeType::LocalVar
                | NodeType::InstVar
                | NodeType::GlobalVar
                | NodeType::ClassVar
                | NodeType::Const
                | NodeType::Colon3
                | NodeType::VCall
        );
        assert_eq!(node.child_nodes().is_empty(), leaf, "{}", node.node_type());
    }
}

#[test]
fn call_children_are_receiver_then_args() {
    let with_args: Node =
        CallNode::new(sp(), self_node(), "foo", Some(list(vec![int(1)])), false).into();
    assert_eq!(child_tags(&with_args), vec![NodeType::SelfRef, NodeType::List]);

    let without: Node = CallNode::new(sp(), self_node(), "foo", None, false).into();
    assert_eq!(child_tags(&without), vec![NodeType::SelfRef]);
}

#[test]
fn if_omits_missing_branches() {
    let cond = || Node::from(TrueNode::new(sp()));
    let full: Node = IfNode::new(sp(), cond(), Some(int(1)), Some(vcall("x"))).into();
    assert_eq!(child_tags(&full), vec![NodeType::True, NodeType::Fixnum, NodeType::VCall]);

    let no_then: Node = IfNode::new(sp(), cond(), None, Some(vcall("x"))).into();
    assert_eq!(child_tags(&no_then), vec![NodeType::True, NodeType::VCall]);

    let bare: Node = IfNode::new(sp(), cond(), None, None).into();
    assert_eq!(child_tags(&bare), vec![NodeType::True]);
}

#[test]
fn class_children_in_declared_order() {
    let cpath: Node = ConstNode::new(sp(), "C").into();
    let full: Node = ClassNode::new(
        sp(),
        cpath.clone(),
        Some(Colon3Node::new(sp(), "S").into()),
        Some(NilNode::new(sp()).into()),
    )
    .into();
    assert_eq!(
        child_tags(&full),
        vec![NodeType::Const, NodeType::Colon3, NodeType::Nil]
    );

    let no_super: Node = ClassNode::new(sp(), cpath, None, Some(int(1))).into();
    assert_eq!(child_tags(&no_super), vec![NodeType::Const, NodeType::Fixnum]);
}

#[test]
fn multiple_asgn_lists_targets_before_value() {
    let node: Node = MultipleAsgnNode::new(
        sp(),
        vec![
            LocalVarNode::new(sp(), "a").into(),
            InstVarNode::new(sp(), "@b").into(),
        ],
        ArrayNode::new(sp(), vec![int(1), int(2)]).into(),
    )
    .into();
    assert_eq!(
        child_tags(&node),
        vec![NodeType::LocalVar, NodeType::InstVar, NodeType::Array]
    );
}

#[test]
fn empty_optional_children_are_omitted() {
    let cases: Vec<Node> = vec![
        RootNode::new(sp(), "t.rb", None).into(),
        ReturnNode::new(sp(), None).into(),
        YieldNode::new(sp(), None).into(),
        FCallNode::new(sp(), "p", None).into(),
        WhileNode::new(sp(), int(1), None).into(),
        ModuleNode::new(sp(), ConstNode::new(sp(), "M").into(), None).into(),
    ];
    let expected = [0, 0, 0, 0, 1, 1];
    for (node, count) in cases.iter().zip(expected) {
        assert_eq!(node.child_nodes().len(), count, "{}", node.node_type());
    }
}

#[test_case(self_node(), true; "self receiver")]
#[test_case(vcall("a"), false; "identifier receiver")]
#[test_case(LocalVarNode::new(sp(), "self").into(), false; "local named self")]
#[test_case(CallNode::new(sp(), self_node(), "b", None, false).into(), false; "call on self")]
fn attr_assign_is_self_follows_receiver_tag(receiver: Node, expected: bool) {
    let is_self_tag = receiver.node_type() == NodeType::SelfRef;
    let node = AttrAssignNode::new(sp(), receiver, "x=", Some(list(vec![int(1)])), false);
    assert_eq!(node.is_self(), expected);
    assert_eq!(node.is_self(), is_self_tag);
}

#[test]
fn attr_assign_builder_attaches_args_later() {
    let pending = AttrAssignNode::builder(Span::new(0, 3, 1), vcall("a"), "b=", true);
    assert_eq!(pending.name(), "b=");
    let node = pending.with_args(ListNode::new(Span::new(6, 7, 1), vec![int(1)]));
    assert!(node.is_lazy());
    assert!(!node.is_self());
    assert_eq!(node.span(), Span::new(0, 7, 1));
    let args = node.args_node().unwrap();
    assert_eq!(args.node_type(), NodeType::List);
    assert_eq!(args.child_nodes().len(), 1);
}

#[test]
fn attr_assign_without_args_has_receiver_only() {
    let node = AttrAssignNode::builder(sp(), self_node(), "b=", false).without_args();
    assert!(node.args_node().is_none());
    assert!(node.is_self());
    assert_eq!(child_tags(&Node::from(node)), vec![NodeType::SelfRef]);
}

#[test]
fn const_decl_prefers_plain_name() {
    let path: Node = Colon2Node::new(sp(), ConstNode::new(sp(), "Foo").into(), "BAR").into();
    let both = ConstDeclNode::new(sp(), Some("BAZ".into()), Some(path.clone()), int(1)).unwrap();
    assert_eq!(both.name(), "BAZ");

    let path_only = ConstDeclNode::new(sp(), None, Some(path), int(1)).unwrap();
    assert_eq!(path_only.name(), "BAR");
    assert_eq!(path_only.scope_node().and_then(Node::name), Some("Foo"));

    let name_only = ConstDeclNode::new(sp(), Some("FOO".into()), None, int(1)).unwrap();
    assert_eq!(name_only.name(), "FOO");
    assert!(name_only.const_node().is_none());
    assert!(name_only.scope_node().is_none());
}

#[test]
fn const_decl_treats_empty_name_as_absent() {
    let path: Node = Colon2Node::new(sp(), ConstNode::new(sp(), "Foo").into(), "BAR").into();
    let node = ConstDeclNode::new(sp(), Some(String::new()), Some(path), int(1)).unwrap();
    assert_eq!(node.name(), "BAR");
}

#[test]
fn const_decl_children_are_path_then_value() {
    let path: Node = Colon3Node::new(sp(), "TOP").into();
    let node: Node = ConstDeclNode::new(sp(), None, Some(path), int(1)).unwrap().into();
    assert_eq!(child_tags(&node), vec![NodeType::Colon3, NodeType::Fixnum]);
    assert_eq!(node.name(), Some("TOP"));
}

#[test]
fn const_decl_requires_a_name() {
    assert_eq!(
        ConstDeclNode::new(sp(), None, None, int(1)),
        Err(NodeError::MissingConstName)
    );
    assert_eq!(
        ConstDeclNode::new(sp(), Some(String::new()), None, int(1)),
        Err(NodeError::MissingConstName)
    );
    assert_eq!(
        ConstDeclNode::new(sp(), None, Some(int(3)), int(1)),
        Err(NodeError::NamelessPath(NodeType::Fixnum))
    );
}

#[test]
fn capabilities_are_queried_without_variant_knowledge() {
    let nodes = samples();
    let named: Vec<&str> = nodes.iter().filter_map(Node::name).collect();
    assert!(named.contains(&"b="));
    assert!(named.contains(&"FOO"));
    assert!(named.contains(&"Bar"));
    assert!(!named.contains(&"t.rb"));

    let with_args = samples()
        .iter()
        .filter(|node| node.as_argument_node().is_some())
        .count();
    assert_eq!(with_args, 4);

    for node in samples() {
        if let Some(asgn) = node.as_assignable_node() {
            assert_eq!(asgn.value_node().node_type(), NodeType::Fixnum);
        }
    }
}

#[test]
fn trees_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Node>();
}
