use abiml_driver::DriverError;
use abiml_ir::*;
use abiml_reader::err::ReadError;
use abiml_tests::{class_named, unit, unit_err};
use pretty_assertions::assert_eq;

#[test]
fn single_basic_type_document() {
    let tu = unit(r#"
        <abi-instr version="1.0" path="t.cc" address-size="64">
          <type-decl name="int" size-in-bits="32" alignment-in-bits="32" id="type-id-1"/>
        </abi-instr>
    "#);
    assert_eq!(tu.path, "t.cc");
    assert_eq!(tu.address_size, Some(64));
    assert_eq!(tu.global.len(), 1);
    assert_eq!(tu.len(), 1);
    let Node::Basic(basic) = &tu[&tu.global[0]] else { panic!("expected a basic type") };
    assert_eq!(basic.name, "int");
    assert_eq!((basic.size, basic.align), (32, 32));
}

#[test]
fn missing_address_size_stays_unset() {
    let tu = unit("<abi-instr/>");
    assert_eq!(tu.address_size, None);
    assert!(tu.is_empty());
    // no path attribute: the caller-supplied name stands
    assert_eq!(tu.path, "<fixture>");
}

#[test]
fn duplicate_id_is_rejected() {
    let err = unit_err(r#"
        <abi-instr>
          <type-decl name="int" size-in-bits="32" id="type-id-1"/>
          <type-decl name="char" size-in-bits="8" id="type-id-1"/>
        </abi-instr>
    "#);
    assert!(matches!(
        err,
        DriverError::Read(ReadError::DuplicateId(id)) if id == "type-id-1"
    ));
}

#[test]
fn forward_reference_is_rejected() {
    let err = unit_err(r#"
        <abi-instr>
          <pointer-type-def type-id="type-id-1" size-in-bits="64" id="type-id-2"/>
          <type-decl name="int" size-in-bits="32" id="type-id-1"/>
        </abi-instr>
    "#);
    assert!(matches!(
        err,
        DriverError::Read(ReadError::UnresolvedId(id)) if id == "type-id-1"
    ));
}

#[test]
fn references_resolve_in_document_order() {
    let tu = unit(r#"
        <abi-instr>
          <type-decl name="int" size-in-bits="32" id="t-int"/>
          <qualified-type-def type-id="t-int" const="yes" id="t-cint"/>
          <pointer-type-def type-id="t-cint" size-in-bits="64" id="t-pcint"/>
          <reference-type-def type-id="t-int" kind="rvalue" size-in-bits="64" id="t-rint"/>
          <typedef-decl name="myint" type-id="t-int" id="t-myint"/>
        </abi-instr>
    "#);
    assert_eq!(tu.global.len(), 5);
    let int_id = tu.global[0];
    let Node::Qualified(q) = &tu[&tu.global[1]] else { panic!("expected a qualified type") };
    assert_eq!(q.underlying, int_id);
    assert_eq!(q.cv, CvQual::CONST);
    let Node::Pointer(p) = &tu[&tu.global[2]] else { panic!("expected a pointer") };
    assert_eq!(p.pointee, tu.global[1]);
    assert_eq!(p.size, 64);
    let Node::Reference(r) = &tu[&tu.global[3]] else { panic!("expected a reference") };
    assert_eq!(r.referent, int_id);
    assert_eq!(r.kind, RefKind::Rvalue);
    let Node::Typedef(td) = &tu[&tu.global[4]] else { panic!("expected a typedef") };
    assert_eq!(td.underlying, int_id);
}

#[test]
fn enumerator_order_is_preserved() {
    let tu = unit(r#"
        <abi-instr>
          <type-decl name="unsigned int" size-in-bits="32" id="t-uint"/>
          <enum-decl name="E" id="t-e">
            <underlying-type type-id="t-uint"/>
            <enumerator name="ZERO" value="0"/>
            <enumerator name="MINUS" value="-3"/>
            <enumerator name="BIG" value="1000"/>
          </enum-decl>
        </abi-instr>
    "#);
    let e = tu.global_named("E").unwrap();
    let Node::Enum(en) = &tu[&e] else { panic!("expected an enum") };
    assert_eq!(en.underlying, tu.global[0]);
    let names: Vec<_> = en.enumerators.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["ZERO", "MINUS", "BIG"]);
    let values: Vec<_> = en.enumerators.iter().map(|e| e.value).collect();
    assert_eq!(values, [0, -3, 1000]);
}

#[test]
fn enum_without_underlying_type_is_rejected() {
    let err = unit_err(r#"
        <abi-instr>
          <enum-decl name="E" id="t-e">
            <enumerator name="A" value="0"/>
          </enum-decl>
        </abi-instr>
    "#);
    assert!(matches!(
        err,
        DriverError::Read(ReadError::MissingChild { child: "underlying-type", .. })
    ));
}

#[test]
fn class_members_collapse_one_scope_level() {
    let tu = unit(r#"
        <abi-instr>
          <type-decl name="int" size-in-bits="32" id="t-int"/>
          <class-decl name="K" size-in-bits="96" id="t-k" visibility="default">
            <data-member access="private" layout-offset-in-bits="0">
              <var-decl name="x" type-id="t-int"/>
            </data-member>
            <data-member access="private" static="yes">
              <var-decl name="count" type-id="t-int"/>
            </data-member>
            <member-function access="public" vtable-offset="2" const="yes">
              <function-decl name="get">
                <return type-id="t-int"/>
              </function-decl>
            </member-function>
            <member-function access="public">
              <function-decl name="reset"/>
            </member-function>
          </class-decl>
          <type-decl name="char" size-in-bits="8" id="t-char"/>
        </abi-instr>
    "#);
    // the element after the class lands back in the global scope
    assert_eq!(tu.global.len(), 3);
    assert_eq!(tu[&tu.global[2]].name(), Some("char"));
    let (k, class) = class_named(&tu, "K");
    assert_eq!(class.visibility, Some(Visibility::Default));
    assert_eq!(class.data_members.len(), 2);
    let x = &class.data_members[0];
    assert_eq!(tu[&x.var].name(), Some("x"));
    assert_eq!(x.access, Some(Access::Private));
    // laid out at offset 0 is not the same as not laid out
    assert_eq!(x.offset, Some(0));
    let count = &class.data_members[1];
    assert!(count.is_static);
    assert_eq!(count.offset, None);
    assert_eq!(class.member_fns.len(), 2);
    let get = &class.member_fns[0];
    assert_eq!((get.vtable_offset, get.is_const, get.is_ctor), (Some(2), true, false));
    let Node::Function(f) = &tu[&get.func] else { panic!("expected a function") };
    assert_eq!(f.sig.receiver, Some(k));
    assert!(f.sig.params.is_empty());
    assert_eq!(f.sig.ret, Some(tu.global[0]));
    // no vtable-offset attribute is not the same as slot 0
    assert_eq!(class.member_fns[1].vtable_offset, None);
    // member internals are recorded on the class, not in its lexical scope
    assert!(class.members.is_empty());
}

#[test]
fn data_member_offsets_are_bit_granular() {
    let tu = unit(r#"
        <abi-instr>
          <type-decl name="int" size-in-bits="32" id="t-int"/>
          <class-decl name="P" size-in-bits="64" id="t-p">
            <data-member access="private" layout-offset-in-bits="32">
              <var-decl name="y" type-id="t-int"/>
            </data-member>
          </class-decl>
        </abi-instr>
    "#);
    let (_, class) = class_named(&tu, "P");
    assert_eq!(class.data_members[0].offset, Some(32));
}

#[test]
fn base_classes_are_recorded() {
    let tu = unit(r#"
        <abi-instr>
          <class-decl name="B" size-in-bits="32" id="t-b"/>
          <class-decl name="D" size-in-bits="64" id="t-d">
            <base-class type-id="t-b" access="public" layout-offset-in-bits="0" is-virtual="yes"/>
          </class-decl>
        </abi-instr>
    "#);
    let (b, _) = class_named(&tu, "B");
    let (_, d) = class_named(&tu, "D");
    assert_eq!(d.bases.len(), 1);
    let base = &d.bases[0];
    assert_eq!(base.base, b);
    assert_eq!(base.access, Some(Access::Public));
    assert_eq!(base.offset, Some(0));
    assert!(base.is_virtual);
}

#[test]
fn declaration_definition_linkage() {
    let tu = unit(r#"
        <abi-instr>
          <class-decl name="C" is-declaration-only="yes" id="C1"/>
          <pointer-type-def type-id="C1" size-in-bits="64" id="t-pc"/>
          <type-decl name="int" size-in-bits="32" id="t-int"/>
          <class-decl name="C" size-in-bits="32" def-of-decl-id="C1" id="C2">
            <data-member access="public" layout-offset-in-bits="0">
              <var-decl name="n" type-id="t-int"/>
            </data-member>
          </class-decl>
          <typedef-decl name="C_t" type-id="C1" id="t-ct"/>
        </abi-instr>
    "#);
    let stub = tu.global[0];
    let Node::Class(stub_class) = &tu[&stub] else { panic!("expected a class") };
    assert!(stub_class.is_decl_only);
    assert!(stub_class.data_members.is_empty());
    // references made before the definition still point at the stub
    let Node::Pointer(p) = &tu[&tu.global[1]] else { panic!("expected a pointer") };
    assert_eq!(p.pointee, stub);
    // the definition links back to its earlier declaration
    let def = tu.global[3];
    let Node::Class(def_class) = &tu[&def] else { panic!("expected a class") };
    assert!(!def_class.is_decl_only);
    assert_eq!(def_class.earlier_decl, Some(stub));
    assert_eq!(def_class.data_members.len(), 1);
    // after the definition, the stub's id resolves to the definition
    let Node::Typedef(td) = &tu[&tu.global[4]] else { panic!("expected a typedef") };
    assert_eq!(td.underlying, def);
}

#[test]
fn definition_cannot_be_declaration_only() {
    let err = unit_err(r#"
        <abi-instr>
          <class-decl name="C" is-declaration-only="yes" id="C1"/>
          <class-decl name="C" is-declaration-only="yes" def-of-decl-id="C1" id="C2"/>
        </abi-instr>
    "#);
    assert!(matches!(err, DriverError::Read(ReadError::DeclOnlyDefinition(_))));
}

#[test]
fn repeated_forward_declaration_reuses_the_stub() {
    let tu = unit(r#"
        <abi-instr>
          <class-decl name="C" is-declaration-only="yes" id="C1"/>
          <class-decl name="C" is-declaration-only="yes" id="C1"/>
          <pointer-type-def type-id="C1" size-in-bits="64" id="t-pc"/>
        </abi-instr>
    "#);
    // one stub node, referenced by the pointer
    let stubs: Vec<_> = tu
        .nodes()
        .filter(|node| matches!(node, Node::Class(c) if c.is_decl_only))
        .collect();
    assert_eq!(stubs.len(), 1);
}

#[test]
fn functions_with_parameters_and_variadic() {
    let tu = unit(r#"
        <abi-instr>
          <type-decl name="int" size-in-bits="32" id="t-int"/>
          <function-decl name="printf" mangled-name="printf" binding="global">
            <parameter type-id="t-int" name="fmt"/>
            <parameter is-variadic="yes"/>
            <return type-id="t-int"/>
          </function-decl>
        </abi-instr>
    "#);
    let f = tu.global_named("printf").unwrap();
    let Node::Function(func) = &tu[&f] else { panic!("expected a function") };
    assert_eq!(func.mangled_name.as_deref(), Some("printf"));
    assert_eq!(func.binding, Some(Binding::Global));
    assert_eq!(func.sig.receiver, None);
    assert_eq!(func.sig.params.len(), 2);
    assert_eq!(func.sig.params[0].name, "fmt");
    assert_eq!(func.sig.params[0].ty, Some(tu.global[0]));
    assert!(func.sig.params[1].is_variadic);
    assert_eq!(func.sig.params[1].ty, None);
}

#[test]
fn second_variadic_parameter_is_rejected() {
    let err = unit_err(r#"
        <abi-instr>
          <function-decl name="bad">
            <parameter is-variadic="yes"/>
            <parameter is-variadic="yes"/>
          </function-decl>
        </abi-instr>
    "#);
    assert!(matches!(err, DriverError::Read(ReadError::ExtraVariadic(_))));
}

#[test]
fn non_variadic_parameter_requires_a_type() {
    let err = unit_err(r#"
        <abi-instr>
          <function-decl name="bad">
            <parameter name="x"/>
          </function-decl>
        </abi-instr>
    "#);
    assert!(matches!(
        err,
        DriverError::Read(ReadError::MissingAttr { attr: "type-id", .. })
    ));
}

#[test]
fn function_template_with_parameters_and_pattern() {
    let tu = unit(r#"
        <abi-instr>
          <type-decl name="int" size-in-bits="32" id="t-int"/>
          <function-template-decl id="fn-tmpl-1" binding="global">
            <template-type-parameter id="t-param-t" name="T"/>
            <template-non-type-parameter type-id="t-int" name="N"/>
            <function-decl name="make">
              <parameter type-id="t-param-t" name="seed"/>
              <return type-id="t-param-t"/>
            </function-decl>
          </function-template-decl>
        </abi-instr>
    "#);
    assert_eq!(tu.global.len(), 2);
    let Node::FnTemplate(tmpl) = &tu[&tu.global[1]] else { panic!("expected a template") };
    assert_eq!(tmpl.params.len(), 2);
    let Node::TypeTemplateParam(t) = &tu[&tmpl.params[0]] else { panic!("expected a param") };
    assert_eq!((t.index, t.name.as_str()), (0, "T"));
    let Node::NonTypeTemplateParam(n) = &tu[&tmpl.params[1]] else { panic!("expected a param") };
    assert_eq!((n.index, n.name.as_str()), (1, "N"));
    assert_eq!(n.ty, tu.global[0]);
    // the pattern's parameter resolves to the registered type parameter
    let pattern = tmpl.pattern.expect("pattern built");
    let Node::Function(f) = &tu[&pattern] else { panic!("expected a function") };
    assert_eq!(f.sig.params[0].ty, Some(tmpl.params[0]));
    assert_eq!(f.sig.ret, Some(tmpl.params[0]));
}

#[test]
fn template_without_pattern_is_rejected() {
    let err = unit_err(r#"
        <abi-instr>
          <function-template-decl id="fn-tmpl-1">
            <template-type-parameter id="t-param-t" name="T"/>
          </function-template-decl>
        </abi-instr>
    "#);
    assert!(matches!(
        err,
        DriverError::Read(ReadError::MissingChild { child: "function-decl", .. })
    ));
}

#[test]
fn member_template_does_not_over_collapse() {
    let tu = unit(r#"
        <abi-instr>
          <type-decl name="int" size-in-bits="32" id="t-int"/>
          <class-decl name="K" size-in-bits="32" id="t-k">
            <member-template access="public">
              <function-template-decl id="fn-tmpl-1">
                <template-type-parameter id="t-param-t" name="T"/>
                <function-decl name="convert">
                  <parameter type-id="t-param-t" name="v"/>
                  <return type-id="t-int"/>
                </function-decl>
              </function-template-decl>
            </member-template>
            <data-member access="private" layout-offset-in-bits="0">
              <var-decl name="n" type-id="t-int"/>
            </data-member>
          </class-decl>
          <type-decl name="char" size-in-bits="8" id="t-char"/>
        </abi-instr>
    "#);
    // the class survived its member template: the data member that follows
    // it still landed on the class
    let (_, class) = class_named(&tu, "K");
    assert_eq!(class.member_templates.len(), 1);
    assert_eq!(class.data_members.len(), 1);
    assert_eq!(tu[&class.data_members[0].var].name(), Some("n"));
    let Node::FnTemplate(tmpl) = &tu[&class.member_templates[0].tmpl] else {
        panic!("expected a template")
    };
    assert_eq!(tmpl.params.len(), 1);
    assert!(tmpl.pattern.is_some());
    // and the element after the class is global
    assert_eq!(tu.global.len(), 3);
    assert_eq!(tu[&tu.global[2]].name(), Some("char"));
}

#[test]
fn class_template_with_pattern() {
    let tu = unit(r#"
        <abi-instr>
          <class-template-decl id="class-tmpl-1">
            <template-type-parameter id="t-param-t" name="T"/>
            <class-decl name="box" size-in-bits="64" id="t-box">
              <data-member access="private" layout-offset-in-bits="0">
                <var-decl name="value" type-id="t-param-t"/>
              </data-member>
            </class-decl>
          </class-template-decl>
        </abi-instr>
    "#);
    assert_eq!(tu.global.len(), 1);
    let Node::ClassTemplate(tmpl) = &tu[&tu.global[0]] else { panic!("expected a template") };
    assert_eq!(tmpl.params.len(), 1);
    let pattern = tmpl.pattern.expect("pattern built");
    let Node::Class(class) = &tu[&pattern] else { panic!("expected a class") };
    assert_eq!(class.name, "box");
    assert_eq!(class.data_members.len(), 1);
    assert_eq!(tu[&class.data_members[0].var].name(), Some("value"));
}

#[test]
fn unexpected_root_is_rejected() {
    let err = unit_err("<not-abi/>");
    assert!(matches!(
        err,
        DriverError::Read(ReadError::UnexpectedRoot(name)) if name == "not-abi"
    ));
}
