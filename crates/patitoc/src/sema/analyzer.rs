//! Semantic analyzer - event sink driven by the parser
//!
//! The front end calls one `on_*` method per construct, in source order, and
//! feeds the returned [`ExprType`] back into its own attribute stack.
//! Recoverable problems are accumulated as [`Fault`]s; protocol violations
//! by the driver come back as [`FatalError`] and end the pass.

use super::compat;
use super::fault::{FatalError, Fault, SemanticFault};
use super::registry::{Dump, FunctionEntry, FunctionId, FunctionRegistry, GLOBAL};
use super::scope::VariableScope;
use crate::common::Span;
use crate::types::{BinaryOp, ExprType, ReturnType, Type, UnaryOp};

/// Which scope bare names resolve against
#[derive(Debug)]
enum Context {
    /// No event seen yet
    Start,
    Global,
    Function(FunctionId),
    /// Body of a function whose name was already taken. It is checked like
    /// any other body but never enters the registry.
    Detached(Box<FunctionEntry>),
}

/// Semantic analyzer for one program
#[derive(Debug)]
pub struct SemanticAnalyzer {
    registry: FunctionRegistry,
    context: Context,
    faults: Vec<Fault>,
    span: Span,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            registry: FunctionRegistry::new(),
            context: Context::Start,
            faults: Vec::new(),
            span: Span::default(),
        }
    }

    /// Attach `span` to faults reported from now on
    pub fn locate(&mut self, span: Span) {
        self.span = span;
    }

    fn report(&mut self, error: SemanticFault) {
        log::debug!("semantic fault at {:?}: {error}", self.span);
        self.faults.push(Fault::new(error, self.span));
    }

    /// Name of the function bare names currently resolve against
    pub fn current_function(&self) -> &str {
        match &self.context {
            Context::Start | Context::Global => GLOBAL,
            Context::Function(id) => self.registry.entry(*id).name.as_str(),
            Context::Detached(entry) => entry.name.as_str(),
        }
    }

    fn inside_function(&self) -> bool {
        matches!(self.context, Context::Function(_) | Context::Detached(_))
    }

    fn current_scope_mut(&mut self) -> &mut VariableScope {
        match &mut self.context {
            Context::Start | Context::Global => &mut self.registry.entry_mut(FunctionId::GLOBAL).locals,
            Context::Function(id) => &mut self.registry.entry_mut(*id).locals,
            Context::Detached(entry) => &mut entry.locals,
        }
    }

    fn resolve(&self, name: &str) -> Option<Type> {
        match &self.context {
            Context::Start | Context::Global => self.registry.resolve_in(FunctionId::GLOBAL, name),
            Context::Function(id) => self.registry.resolve_in(*id, name),
            Context::Detached(entry) => entry
                .locals
                .lookup(name)
                .or_else(|| self.registry.global().lookup(name)),
        }
    }

    /// A function header was recognized.
    ///
    /// Before anything else, `global` claims the reserved program root and
    /// sets its return type. Any other name opens a function body.
    pub fn on_function_start(
        &mut self,
        name: &str,
        return_type: impl Into<ReturnType>,
    ) -> Result<(), FatalError> {
        let return_type = return_type.into();

        if self.inside_function() {
            return Err(FatalError::NestedFunction {
                outer: self.current_function().to_string(),
                inner: name.to_string(),
            });
        }

        if matches!(self.context, Context::Start) && name == GLOBAL {
            log::debug!("program root declared with return type {return_type}");
            self.registry.entry_mut(FunctionId::GLOBAL).return_type = return_type;
            self.context = Context::Global;
            return Ok(());
        }

        log::debug!("entering function '{name}' -> {return_type}");
        self.context = match self.registry.declare_function(name, return_type) {
            Ok(id) => Context::Function(id),
            Err(fault) => {
                self.report(fault);
                Context::Detached(Box::new(FunctionEntry::new(name, return_type)))
            }
        };
        Ok(())
    }

    /// A parameter of the current function was recognized. A named
    /// parameter is also declared as a local.
    pub fn on_param_declared(&mut self, name: Option<&str>, ty: Type) -> Result<(), FatalError> {
        match &mut self.context {
            Context::Start | Context::Global => return Err(FatalError::ParamOutsideFunction),
            Context::Function(id) => self.registry.entry_mut(*id).params.push(ty),
            Context::Detached(entry) => entry.params.push(ty),
        }

        if let Some(name) = name {
            self.on_variable_declared(name, ty);
        }
        Ok(())
    }

    /// A variable declaration in the current scope
    pub fn on_variable_declared(&mut self, name: &str, ty: Type) {
        log::debug!("declaring {name}: {ty} in '{}'", self.current_function());
        if let Err(fault) = self.current_scope_mut().declare(name, ty) {
            self.report(fault);
        }
    }

    /// A bare variable reference
    pub fn on_variable_used(&mut self, name: &str) -> ExprType {
        match self.resolve(name) {
            Some(ty) => ty.into(),
            None => {
                self.report(SemanticFault::UndeclaredVariable {
                    name: name.to_string(),
                });
                ExprType::Error
            }
        }
    }

    /// A call to `name`; its value is the callee's return type.
    /// Arguments are not checked against the signature.
    pub fn on_function_called(&mut self, name: &str) -> ExprType {
        match self.registry.get_function(name) {
            Some(entry) => entry.return_type.into(),
            None => {
                self.report(SemanticFault::UndeclaredFunction {
                    name: name.to_string(),
                });
                ExprType::Error
            }
        }
    }

    /// `left op right`. An operand that is already `Error` was reported
    /// where it originated, so only fresh incompatibilities are reported.
    pub fn on_operation(&mut self, op: BinaryOp, left: ExprType, right: ExprType) -> ExprType {
        let result = compat::result_of_operation(op, left, right);
        if result.is_error() && !left.is_error() && !right.is_error() {
            self.report(SemanticFault::IncompatibleOperands { op, left, right });
        }
        result
    }

    /// Signed operand
    pub fn on_unary(&mut self, op: UnaryOp, operand: ExprType) -> ExprType {
        let result = compat::result_of_unary(op, operand);
        if result.is_error() && !operand.is_error() {
            self.report(SemanticFault::IncompatibleOperand { op, operand });
        }
        result
    }

    /// `target = value`
    pub fn on_assignment(&mut self, target: ExprType, value: ExprType) -> ExprType {
        let result = compat::result_of_assignment(target, value);
        if result.is_error() && !target.is_error() && !value.is_error() {
            self.report(SemanticFault::IncompatibleAssignment { target, value });
        }
        result
    }

    /// End of the current function body; names resolve globally again
    pub fn on_function_end(&mut self) -> Result<(), FatalError> {
        if !self.inside_function() {
            return Err(FatalError::UnbalancedFunctionEnd);
        }
        log::debug!("leaving function '{}'", self.current_function());
        self.context = Context::Global;
        Ok(())
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn dump(&self) -> Dump {
        self.registry.dump()
    }

    /// End the pass
    pub fn finish(self) -> Result<Analysis, FatalError> {
        if self.inside_function() {
            return Err(FatalError::UnterminatedFunction {
                name: self.current_function().to_string(),
            });
        }
        Ok(Analysis {
            registry: self.registry,
            faults: self.faults,
        })
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a completed pass
#[derive(Debug)]
pub struct Analysis {
    pub registry: FunctionRegistry,
    pub faults: Vec<Fault>,
}

impl Analysis {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn directory(&self) -> Dump {
        self.registry.dump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::FunctionSummary;
    use crate::sema::VariableEntry;
    use pretty_assertions::assert_eq;

    fn errors(analyzer: &SemanticAnalyzer) -> Vec<SemanticFault> {
        analyzer.faults().iter().map(|f| f.error.clone()).collect()
    }

    fn var(name: &str, ty: Type) -> VariableEntry {
        VariableEntry {
            name: name.to_string(),
            ty,
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_function_start(GLOBAL, Type::Int).unwrap();
        analyzer.on_variable_declared("a", Type::Int);
        analyzer.on_function_start("main", Type::Int).unwrap();
        analyzer.on_variable_declared("b", Type::Float);
        assert_eq!(analyzer.on_variable_used("a"), ExprType::Int);
        assert_eq!(
            analyzer.on_operation(BinaryOp::Add, ExprType::Int, ExprType::Float),
            ExprType::Float
        );
        assert_eq!(
            analyzer.on_assignment(ExprType::Float, ExprType::Float),
            ExprType::Float
        );
        analyzer.on_function_end().unwrap();

        let analysis = analyzer.finish().unwrap();
        assert!(analysis.is_clean());
        assert_eq!(
            analysis.directory().functions(),
            [
                FunctionSummary {
                    name: "global".to_string(),
                    return_type: Type::Int.into(),
                    params: vec![],
                    variables: vec![var("a", Type::Int)],
                },
                FunctionSummary {
                    name: "main".to_string(),
                    return_type: Type::Int.into(),
                    params: vec![],
                    variables: vec![var("b", Type::Float)],
                },
            ]
        );
        assert_eq!(
            analysis.directory().to_string(),
            "global {ret=int, params=[], vars={a:int}}\nmain {ret=int, params=[], vars={b:float}}\n"
        );
    }

    #[test]
    fn test_dump_is_idempotent() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_variable_declared("g", Type::Float);
        analyzer.on_function_start("f", ReturnType::Void).unwrap();
        analyzer.on_param_declared(Some("p"), Type::Int).unwrap();

        let first = analyzer.dump();
        let second = analyzer.dump();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_duplicate_variable_is_recoverable() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_variable_declared("x", Type::Int);
        analyzer.on_variable_declared("x", Type::Float);
        analyzer.on_variable_declared("y", Type::Float);

        assert_eq!(
            errors(&analyzer),
            [SemanticFault::DuplicateVariable {
                name: "x".to_string(),
                scope: GLOBAL.to_string(),
            }]
        );
        assert_eq!(analyzer.on_variable_used("x"), ExprType::Int);
        assert_eq!(analyzer.on_variable_used("y"), ExprType::Float);
    }

    #[test]
    fn test_scoping_between_functions() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_function_start(GLOBAL, ReturnType::Void).unwrap();
        analyzer.on_variable_declared("g", Type::Int);
        analyzer.on_function_start("f", ReturnType::Void).unwrap();
        analyzer.on_variable_declared("x", Type::Float);
        assert_eq!(analyzer.on_variable_used("x"), ExprType::Float);
        assert_eq!(analyzer.on_variable_used("g"), ExprType::Int);
        analyzer.on_function_end().unwrap();

        assert_eq!(analyzer.current_function(), GLOBAL);
        assert_eq!(analyzer.on_variable_used("x"), ExprType::Error);
        assert_eq!(
            errors(&analyzer),
            [SemanticFault::UndeclaredVariable { name: "x".to_string() }]
        );
    }

    #[test]
    fn test_local_may_reuse_global_name() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_variable_declared("v", Type::Int);
        analyzer.on_function_start("f", ReturnType::Void).unwrap();
        analyzer.on_variable_declared("v", Type::Float);

        assert!(analyzer.faults().is_empty());
        assert_eq!(analyzer.on_variable_used("v"), ExprType::Float);
    }

    #[test]
    fn test_params_extend_signature_and_locals() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_function_start("f", Type::Float).unwrap();
        analyzer.on_param_declared(Some("a"), Type::Int).unwrap();
        analyzer.on_param_declared(None, Type::Float).unwrap();
        analyzer.on_param_declared(Some("a"), Type::Float).unwrap();
        analyzer.on_function_end().unwrap();

        let f = analyzer.registry().get_function("f").unwrap();
        assert_eq!(f.params, vec![Type::Int, Type::Float, Type::Float]);
        assert_eq!(f.locals.snapshot(), [var("a", Type::Int)]);
        assert_eq!(
            errors(&analyzer),
            [SemanticFault::DuplicateVariable {
                name: "a".to_string(),
                scope: "f".to_string(),
            }]
        );
    }

    #[test]
    fn test_param_outside_function_is_fatal() {
        let mut analyzer = SemanticAnalyzer::new();
        assert_eq!(
            analyzer.on_param_declared(Some("p"), Type::Int),
            Err(FatalError::ParamOutsideFunction)
        );
    }

    #[test]
    fn test_duplicate_function_body_is_detached() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_function_start("foo", Type::Int).unwrap();
        analyzer.on_param_declared(Some("a"), Type::Int).unwrap();
        analyzer.on_function_end().unwrap();

        analyzer.on_function_start("foo", ReturnType::Void).unwrap();
        analyzer.on_param_declared(Some("b"), Type::Float).unwrap();
        analyzer.on_variable_declared("c", Type::Float);
        assert_eq!(analyzer.current_function(), "foo");
        assert_eq!(analyzer.on_variable_used("b"), ExprType::Float);
        analyzer.on_function_end().unwrap();

        assert_eq!(
            errors(&analyzer),
            [SemanticFault::DuplicateFunction { name: "foo".to_string() }]
        );
        let foo = analyzer.registry().get_function("foo").unwrap();
        assert_eq!(foo.return_type, ReturnType::Value(Type::Int));
        assert_eq!(foo.params, vec![Type::Int]);
        assert_eq!(foo.locals.snapshot(), [var("a", Type::Int)]);
        assert_eq!(analyzer.registry().len(), 2);
    }

    #[test]
    fn test_global_claimed_only_at_start() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_variable_declared("g", Type::Int);
        analyzer.on_function_start(GLOBAL, Type::Float).unwrap();
        analyzer.on_function_end().unwrap();

        assert_eq!(
            errors(&analyzer),
            [SemanticFault::DuplicateFunction { name: GLOBAL.to_string() }]
        );
        assert_eq!(analyzer.registry().get_return_type(GLOBAL), Ok(ReturnType::Void));
    }

    #[test]
    fn test_nested_function_is_fatal() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_function_start("outer", ReturnType::Void).unwrap();
        assert_eq!(
            analyzer.on_function_start("inner", ReturnType::Void),
            Err(FatalError::NestedFunction {
                outer: "outer".to_string(),
                inner: "inner".to_string(),
            })
        );
    }

    #[test]
    fn test_unbalanced_end_is_fatal() {
        let mut analyzer = SemanticAnalyzer::new();
        assert_eq!(analyzer.on_function_end(), Err(FatalError::UnbalancedFunctionEnd));

        analyzer.on_function_start("f", ReturnType::Void).unwrap();
        analyzer.on_function_end().unwrap();
        assert_eq!(analyzer.on_function_end(), Err(FatalError::UnbalancedFunctionEnd));
    }

    #[test]
    fn test_finish_inside_function_is_fatal() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_function_start("f", ReturnType::Void).unwrap();
        assert_eq!(
            analyzer.finish().unwrap_err(),
            FatalError::UnterminatedFunction { name: "f".to_string() }
        );
    }

    #[test]
    fn test_error_reported_once_per_root_cause() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_variable_declared("f", Type::Float);

        // (missing + 1) * f, assigned to f
        let missing = analyzer.on_variable_used("missing");
        let sum = analyzer.on_operation(BinaryOp::Add, missing, ExprType::Int);
        let product = analyzer.on_operation(BinaryOp::Mul, sum, ExprType::Float);
        let target = analyzer.on_variable_used("f");
        let assigned = analyzer.on_assignment(target, product);

        assert_eq!(product, ExprType::Error);
        assert_eq!(assigned, ExprType::Error);
        assert_eq!(
            errors(&analyzer),
            [SemanticFault::UndeclaredVariable { name: "missing".to_string() }]
        );
    }

    #[test]
    fn test_incompatible_assignment_and_operands() {
        let mut analyzer = SemanticAnalyzer::new();
        assert_eq!(analyzer.on_assignment(ExprType::Int, ExprType::Float), ExprType::Error);
        assert_eq!(
            analyzer.on_operation(BinaryOp::Gt, ExprType::Str, ExprType::Int),
            ExprType::Error
        );
        assert_eq!(analyzer.on_unary(UnaryOp::Neg, ExprType::Void), ExprType::Error);

        assert_eq!(
            errors(&analyzer),
            [
                SemanticFault::IncompatibleAssignment {
                    target: ExprType::Int,
                    value: ExprType::Float,
                },
                SemanticFault::IncompatibleOperands {
                    op: BinaryOp::Gt,
                    left: ExprType::Str,
                    right: ExprType::Int,
                },
                SemanticFault::IncompatibleOperand {
                    op: UnaryOp::Neg,
                    operand: ExprType::Void,
                },
            ]
        );
    }

    #[test]
    fn test_function_call_types() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.on_function_start("half", Type::Float).unwrap();
        analyzer.on_function_end().unwrap();
        analyzer.on_function_start("show", ReturnType::Void).unwrap();
        analyzer.on_function_end().unwrap();

        assert_eq!(analyzer.on_function_called("half"), ExprType::Float);
        assert_eq!(analyzer.on_function_called("show"), ExprType::Void);
        assert_eq!(analyzer.on_function_called("nope"), ExprType::Error);
        assert_eq!(
            errors(&analyzer),
            [SemanticFault::UndeclaredFunction { name: "nope".to_string() }]
        );
    }

    #[test]
    fn test_faults_carry_located_span() {
        let mut analyzer = SemanticAnalyzer::new();
        analyzer.locate(Span::new(10, 15));
        analyzer.on_variable_used("ghost");

        assert_eq!(analyzer.faults()[0].span, Span::new(10, 15));
    }
}
