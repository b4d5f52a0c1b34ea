//! Test fixtures
//!
//! Small programs exercising one slicing behavior each. Every fixture
//! returns the program together with the request that slices it.

use codegraph_slicer::features::ir_provider::{BodyBuilder, ClassBuilder, FieldDef};
use codegraph_slicer::shared::models::{CmpOp, FieldSig, MethodSig, Type, Value};
use codegraph_slicer::{InMemoryProgram, SliceRequest, TargetKind};

use super::builders::*;

/// Program plus the request seeding its slice
pub struct Scenario {
    pub program: InMemoryProgram,
    pub request: SliceRequest,
}

impl Scenario {
    fn new(
        program: InMemoryProgram,
        caller: &MethodSig,
        target: &MethodSig,
        params: Vec<i32>,
    ) -> Self {
        Self {
            program,
            request: SliceRequest::new(
                caller.to_string(),
                target.to_string(),
                TargetKind::Invocation,
                params,
            ),
        }
    }
}

pub fn login_sig() -> MethodSig {
    string_sink("com.app.Login", "login")
}

/// `Login.login(String)` encrypts its argument; `Main.main` passes a literal
/// and `Admin.sudo` passes a static final constant.
pub fn login_scenario() -> Scenario {
    let login = login_sig();
    let main = method("com.app.Main", Type::Void, "main", vec![]);
    let sudo = method("com.app.Admin", Type::Void, "sudo", vec![]);
    let admin_key = FieldSig::new("com.app.Keys", string_ty(), "ADMIN");
    let cipher = Type::object(CIPHER);

    let program = InMemoryProgram::new()
        .with_class(
            ClassBuilder::new("com.app.Login").method(
                BodyBuilder::new(login.clone())
                    .param("r1", 0)
                    .assign_invoke(
                        "r2",
                        virtual_call("r1", string_ty(), string_get_bytes(), vec![]),
                    )
                    .assign_invoke(
                        "r3",
                        static_call(
                            cipher_get_instance(),
                            vec![Value::string("AES/ECB/PKCS5Padding")],
                        ),
                    )
                    .assign_invoke(
                        "r4",
                        virtual_call(
                            "r3",
                            cipher,
                            cipher_do_final(),
                            vec![Value::local("r2", Type::bytes())],
                        ),
                    )
                    .ret_void(),
            ),
        )
        .with_class(
            ClassBuilder::new("com.app.Main").method(
                BodyBuilder::new(main)
                    .constant("r1", string_ty(), text("hunter2"))
                    .invoke(static_call(login.clone(), vec![str_local("r1")]))
                    .ret_void(),
            ),
        )
        .with_class(ClassBuilder::new("com.app.Keys").constant_field(
            "ADMIN",
            string_ty(),
            text("root-pass"),
        ))
        .with_class(
            ClassBuilder::new("com.app.Admin").method(
                BodyBuilder::new(sudo)
                    .assign(str_local("r1"), Value::StaticField(admin_key))
                    .invoke(static_call(login.clone(), vec![str_local("r1")]))
                    .ret_void(),
            ),
        );

    Scenario::new(program, &login, &cipher_do_final(), vec![0])
}

/// `Main.main` passes 5 into `Cfg.init(int)`, which picks "AES" when its
/// argument is at least 3 and "DES" otherwise.
pub fn dead_branch_scenario() -> Scenario {
    let init = method("com.app.Cfg", Type::Void, "init", vec![Type::Int]);
    let main = method("com.app.Main", Type::Void, "main", vec![]);

    let program = InMemoryProgram::new()
        .with_class(
            ClassBuilder::new("com.app.Cfg").method(
                BodyBuilder::new(init.clone())
                    .param("i0", 0)
                    .if_goto(int_cmp("i0", CmpOp::Ge, 3), 4)
                    .constant("r1", string_ty(), text("DES"))
                    .goto(5)
                    .constant("r1", string_ty(), text("AES"))
                    .assign_invoke("r2", static_call(cipher_get_instance(), vec![str_local("r1")]))
                    .ret_void(),
            ),
        )
        .with_class(
            ClassBuilder::new("com.app.Main").method(
                BodyBuilder::new(main)
                    .assign(int_local("i1"), Value::int(5))
                    .invoke(static_call(init.clone(), vec![int_local("i1")]))
                    .ret_void(),
            ),
        );

    Scenario::new(program, &init, &cipher_get_instance(), vec![0])
}

/// `Main.main` derives "AES" from `"AXS".replace('X', 'E')` and hands it to
/// `Cfg.init(String)`.
pub fn replace_fold_scenario() -> Scenario {
    let init = string_sink("com.app.Cfg", "init");
    let main = method("com.app.Main", Type::Void, "main", vec![]);

    let program = InMemoryProgram::new()
        .with_class(
            ClassBuilder::new("com.app.Cfg").method(
                BodyBuilder::new(init.clone())
                    .param("r0", 0)
                    .assign_invoke("r1", static_call(cipher_get_instance(), vec![str_local("r0")]))
                    .ret_void(),
            ),
        )
        .with_class(
            ClassBuilder::new("com.app.Main").method(
                BodyBuilder::new(main)
                    .constant("r1", string_ty(), text("AXS"))
                    .assign_invoke(
                        "r2",
                        virtual_call(
                            "r1",
                            string_ty(),
                            string_replace(),
                            vec![Value::int('X' as i64), Value::int('E' as i64)],
                        ),
                    )
                    .invoke(static_call(init.clone(), vec![str_local("r2")]))
                    .ret_void(),
            ),
        );

    Scenario::new(program, &init, &cipher_get_instance(), vec![0])
}

/// Link `i` of a call chain: `m<i>(String)` forwards its argument
pub fn chain_link(i: usize) -> MethodSig {
    string_sink("com.app.Chain", &format!("m{}", i))
}

/// `m0` holds a literal and passes it through `len - 1` forwarding links;
/// the last link calls `Cipher.getInstance`.
pub fn chain_scenario(len: usize) -> Scenario {
    let last = chain_link(len - 1);
    let mut class = ClassBuilder::new("com.app.Chain");

    for i in 0..len {
        let body = if i == 0 {
            BodyBuilder::new(chain_link(0)).constant("r0", string_ty(), text("DES"))
        } else {
            BodyBuilder::new(chain_link(i)).param("r0", 0)
        };
        let body = if i + 1 < len {
            body.invoke(static_call(chain_link(i + 1), vec![str_local("r0")]))
        } else {
            body.assign_invoke("r1", static_call(cipher_get_instance(), vec![str_local("r0")]))
        };
        class = class.method(body.ret_void());
    }

    let program = InMemoryProgram::new().with_class(class);
    Scenario::new(program, &last, &cipher_get_instance(), vec![0])
}

pub fn cycle_a() -> MethodSig {
    string_sink("com.app.Loop", "a")
}

pub fn cycle_b() -> MethodSig {
    string_sink("com.app.Loop", "b")
}

/// `a(s)` calls `b(s)` and then encrypts with `s`; `b(s)` calls `a(s)`.
pub fn cycle_scenario() -> Scenario {
    let program = InMemoryProgram::new().with_class(
        ClassBuilder::new("com.app.Loop")
            .method(
                BodyBuilder::new(cycle_a())
                    .param("r0", 0)
                    .invoke(static_call(cycle_b(), vec![str_local("r0")]))
                    .assign_invoke("r1", static_call(cipher_get_instance(), vec![str_local("r0")]))
                    .ret_void(),
            )
            .method(
                BodyBuilder::new(cycle_b())
                    .param("r0", 0)
                    .invoke(static_call(cycle_a(), vec![str_local("r0")]))
                    .ret_void(),
            ),
    );
    Scenario::new(program, &cycle_a(), &cipher_get_instance(), vec![0])
}

/// Link `i` of a callee chain: `k<i>()` returns a string
pub fn callee_link(i: usize) -> MethodSig {
    method("com.app.Deep", string_ty(), &format!("k{}", i), vec![])
}

/// `Deep.main` encrypts with the result of `k0()`; each `k<i>` returns
/// `k<i+1>()` and the last link returns the literal "DES".
pub fn callee_chain_scenario(len: usize) -> Scenario {
    let main = method("com.app.Deep", Type::Void, "main", vec![]);
    let mut class = ClassBuilder::new("com.app.Deep").method(
        BodyBuilder::new(main.clone())
            .assign_invoke("r1", static_call(callee_link(0), vec![]))
            .assign_invoke("r2", static_call(cipher_get_instance(), vec![str_local("r1")]))
            .ret_void(),
    );

    for i in 0..len {
        let body = BodyBuilder::new(callee_link(i));
        let body = if i + 1 < len {
            body.assign_invoke("r0", static_call(callee_link(i + 1), vec![]))
        } else {
            body.constant("r0", string_ty(), text("DES"))
        };
        class = class.method(body.ret(str_local("r0")));
    }

    let program = InMemoryProgram::new().with_class(class);
    Scenario::new(program, &main, &cipher_get_instance(), vec![0])
}

pub fn shared_key_field() -> FieldSig {
    FieldSig::new("com.app.Keys", string_ty(), "key")
}

pub fn key_setter() -> MethodSig {
    string_sink("com.app.Setter", "set")
}

/// `Reader.run` reads the static `Keys.key` into `Cipher.getInstance` and
/// resets it afterwards; `Setter.set` stores its argument there and
/// `Main.boot` calls it with "hunter2".
pub fn field_writer_scenario() -> Scenario {
    let key = shared_key_field();
    let reader = method("com.app.Reader", Type::Void, "run", vec![]);
    let boot = method("com.app.Main", Type::Void, "boot", vec![]);

    let program = InMemoryProgram::new()
        .with_class(ClassBuilder::new("com.app.Keys").field(FieldDef {
            sig: key.clone(),
            is_static: true,
            is_final: false,
            constant_value: None,
            is_enum_constant: false,
        }))
        .with_class(
            ClassBuilder::new("com.app.Reader").method(
                BodyBuilder::new(reader.clone())
                    .assign(str_local("r2"), Value::StaticField(key.clone()))
                    .assign_invoke("r3", static_call(cipher_get_instance(), vec![str_local("r2")]))
                    .constant("r4", string_ty(), text("reset"))
                    .assign(Value::StaticField(key.clone()), str_local("r4"))
                    .ret_void(),
            ),
        )
        .with_class(
            ClassBuilder::new("com.app.Setter").method(
                BodyBuilder::new(key_setter())
                    .param("r1", 0)
                    .assign(Value::StaticField(key.clone()), str_local("r1"))
                    .ret_void(),
            ),
        )
        .with_class(
            ClassBuilder::new("com.app.Main").method(
                BodyBuilder::new(boot)
                    .constant("r1", string_ty(), text("hunter2"))
                    .invoke(static_call(key_setter(), vec![str_local("r1")]))
                    .ret_void(),
            ),
        );

    Scenario {
        program,
        request: SliceRequest::new(
            reader.to_string(),
            key.to_string(),
            TargetKind::FieldRead,
            vec![],
        ),
    }
}
