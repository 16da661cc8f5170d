use thiserror::Error;

use crate::{
    ast::{Ast, BinaryOp, NodeId, NodeKind},
    list::{AllocError, RefList},
    node_list::NodeList,
    value::Value,
};

mod arithmetic;
mod compare;
mod functions;

pub use compare::{compare_lists, compare_values};

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// Report evaluation errors as [`ExecResult::Error`]. When false, an
    /// error anywhere in the query turns the whole result into
    /// [`ExecResult::NotFound`].
    pub throw_errors: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions { throw_errors: true }
    }
}

/// Per-call state: the document root, the item under test in the nearest
/// enclosing filter, and whether errors are being reported or suppressed.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// The document (referred to by `$`)
    pub root: &'a Value,
    /// The filter item (referred to by `@`); the root outside filters
    pub current: &'a Value,
    pub throw_errors: bool,
}

impl<'a> EvalContext<'a> {
    pub fn new(root: &'a Value, throw_errors: bool) -> Self {
        EvalContext {
            root,
            current: root,
            throw_errors,
        }
    }

    /// Same root and mode, with `current` moved to a filter item.
    pub fn with_current<'b>(&self, current: &'b Value) -> EvalContext<'b>
    where
        'a: 'b,
    {
        EvalContext {
            root: self.root,
            current,
            throw_errors: self.throw_errors,
        }
    }

    /// Same context with error reporting switched off.
    pub fn quiet(&self) -> Self {
        EvalContext {
            throw_errors: false,
            ..*self
        }
    }

    /// Logs `err` if this context reports errors, and hands it back.
    fn raise(&self, err: EvalError) -> EvalError {
        if self.throw_errors {
            log::debug!("jsonpath evaluation error: {err}");
        }
        err
    }
}

/// Which operand of a binary operator an error is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

/// Errors that abort an evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("{side} operand of '{op}' is not a single numeric value")]
    NotSingleNumber { side: Side, op: &'static str },

    #[error("operand of unary '{op}' is not a single numeric value")]
    UnaryNotSingleNumber { op: &'static str },

    #[error("{func}() requires a numeric value, got {found}")]
    NotNumeric {
        func: &'static str,
        found: &'static str,
    },

    #[error("division by zero in '{op}'")]
    DivisionByZero { op: &'static str },

    #[error("slice step cannot be zero")]
    ZeroSliceStep,

    #[error(transparent)]
    Allocation(#[from] AllocError),
}

impl EvalError {
    /// Fatal errors abort the evaluation even where other errors are
    /// downgraded to an empty or Unknown outcome.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EvalError::Allocation(_))
    }
}

/// Outcome of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    pub fn from_bool(b: bool) -> Self {
        if b { Truth::True } else { Truth::False }
    }

    /// False if either side is False, True if both are True, else Unknown.
    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    /// True if either side is True, False if both are False, else Unknown.
    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    /// Swaps True and False; Unknown stays Unknown.
    pub fn not(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }
}

/// Result of a top-level evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    /// At least one node was selected
    Ok(NodeList),
    /// The query is valid for the document but selects nothing
    NotFound,
    /// Evaluation aborted
    Error(EvalError),
}

impl ExecResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ExecResult::Ok(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ExecResult::NotFound)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExecResult::Error(_))
    }

    pub fn nodes(&self) -> Option<&NodeList> {
        match self {
            ExecResult::Ok(nodes) => Some(nodes),
            _ => None,
        }
    }

    /// The error text, bounded to [`ERROR_MSG_SIZE`](crate::query::ERROR_MSG_SIZE) bytes.
    pub fn error_message(&self) -> Option<String> {
        match self {
            ExecResult::Error(e) => Some(crate::query::bounded_message(e)),
            _ => None,
        }
    }

    /// Selected nodes, empty for NotFound.
    pub fn into_result(self) -> Result<NodeList, EvalError> {
        match self {
            ExecResult::Ok(nodes) => Ok(nodes),
            ExecResult::NotFound => Ok(NodeList::Empty),
            ExecResult::Error(e) => Err(e),
        }
    }
}

/// Whether a step produced anything. Errors travel separately as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    NotFound,
}

type Exec = Result<Status, EvalError>;

/// Depth range in which the traversal helper applies its step.
#[derive(Debug, Clone, Copy)]
struct Window {
    /// First level the step applies at, inclusive
    first: u32,
    /// Deepest level visited, inclusive
    last: u32,
    /// Skip scalars when applying the step
    containers_only: bool,
}

const CHILDREN: Window = Window {
    first: 1,
    last: 1,
    containers_only: false,
};

const DESCENDANTS: Window = Window {
    first: 1,
    last: u32::MAX,
    containers_only: true,
};

/// Evaluates finalized queries against documents.
///
/// # Examples
///
/// ```
/// use match_jsonpath::{Evaluator, ExecResult, convert::from_json_str, parser::parse_query};
///
/// let ast = parse_query("$.services[?@.up == true].name").unwrap();
/// let doc = from_json_str(r#"{"services":[{"name":"db","up":true},{"name":"web","up":false}]}"#).unwrap();
///
/// match Evaluator::new().evaluate(&ast, &doc) {
///     ExecResult::Ok(nodes) => assert_eq!(nodes.scalar_text().as_deref(), Some("db")),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    options: EvalOptions,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvalOptions) -> Self {
        Evaluator { options }
    }

    pub fn throw_errors(mut self, throw_errors: bool) -> Self {
        self.options.throw_errors = throw_errors;
        self
    }

    pub fn options(&self) -> EvalOptions {
        self.options
    }

    /// Runs `ast` against `document`.
    ///
    /// The returned nodes are clones; the document can be dropped afterwards.
    pub fn evaluate(&self, ast: &Ast, document: &Value) -> ExecResult {
        let Some(root) = ast.root() else {
            return ExecResult::NotFound;
        };

        let ctx = EvalContext::new(document, self.options.throw_errors);
        let mut found = NodeList::new();

        match (Engine { ast }).exec(&ctx, root, document, Some(&mut found), true) {
            Err(e) if ctx.throw_errors || e.is_fatal() => ExecResult::Error(e),
            Err(e) => {
                log::trace!("suppressed jsonpath evaluation error: {e}");
                ExecResult::NotFound
            }
            Ok(_) if found.is_empty() => ExecResult::NotFound,
            Ok(_) => ExecResult::Ok(found),
        }
    }
}

/// Visits array indices `start..end` by `step` after applying slice defaults,
/// negative offsets and clamping.
///
/// # Examples
///
/// ```
/// use match_jsonpath::evaluator::slice_indices;
///
/// assert_eq!(slice_indices(10, Some(1), Some(3), None).unwrap(), vec![1, 2]);
/// assert_eq!(slice_indices(4, None, None, Some(-2)).unwrap(), vec![3, 1]);
/// assert!(slice_indices(4, None, None, Some(0)).is_err());
/// ```
pub fn slice_indices(
    len: usize,
    start: Option<i64>,
    end: Option<i64>,
    step: Option<i64>,
) -> Result<Vec<usize>, EvalError> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(EvalError::ZeroSliceStep);
    }

    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let normalize = |bound: i64| if bound < 0 { len.saturating_add(bound) } else { bound };

    let mut indices = Vec::new();
    if step > 0 {
        let lower = start.map_or(0, normalize).clamp(0, len);
        let upper = end.map_or(len, normalize).clamp(0, len);
        let mut i = lower;
        while i < upper {
            indices.push(i as usize);
            i = i.saturating_add(step);
        }
    } else {
        let upper = start.map_or(len - 1, normalize).clamp(-1, len - 1);
        let lower = end.map_or(-len - 1, normalize).clamp(-1, len - 1);
        let mut i = upper;
        while lower < i {
            indices.push(i as usize);
            i = i.saturating_add(step);
        }
    }
    Ok(indices)
}

/// One evaluation over one query; borrowed for the duration of the call.
struct Engine<'q> {
    ast: &'q Ast,
}

impl Engine<'_> {
    fn exec(
        &self,
        ctx: &EvalContext<'_>,
        id: NodeId,
        input: &Value,
        found: Option<&mut NodeList>,
        unwrap: bool,
    ) -> Exec {
        let kind = self.ast.kind(id);
        if kind.is_boolean() {
            let truth = self.truth(ctx, id, input)?;
            return self.append_bool(ctx, id, truth, found);
        }

        match kind {
            NodeKind::Null => self.literal(ctx, id, Value::Null, found),
            NodeKind::Bool(b) => self.literal(ctx, id, Value::Boolean(*b), found),
            NodeKind::Integer(n) => self.literal(ctx, id, Value::Integer(*n), found),
            NodeKind::Float(n) => self.literal(ctx, id, Value::Float(*n), found),
            NodeKind::String(s) => self.literal(ctx, id, Value::String(s.clone()), found),

            NodeKind::Root => self.next(ctx, id, ctx.root, found),
            NodeKind::Current => self.next(ctx, id, ctx.current, found),

            NodeKind::Key(name) => match input.get(name) {
                Some(v) => self.next(ctx, id, v, found),
                None => Ok(Status::NotFound),
            },

            NodeKind::Wildcard => match input {
                Value::Object(_) | Value::Array(_) => {
                    self.any_item(ctx, self.ast.continuation(id), input, found, 1, CHILDREN, true)
                }
                _ => Ok(Status::NotFound),
            },

            NodeKind::Index(index) => {
                let Value::Array(arr) = input else {
                    return Ok(Status::NotFound);
                };
                let len = arr.len() as i64;
                let at = if *index < 0 { len + index } else { *index };
                match usize::try_from(at).ok().and_then(|i| arr.get(i)) {
                    Some(v) => self.next(ctx, id, v, found),
                    None => Ok(Status::NotFound),
                }
            }

            NodeKind::Slice { start, end, step } => {
                let Value::Array(arr) = input else {
                    return Ok(Status::NotFound);
                };
                let indices =
                    slice_indices(arr.len(), *start, *end, *step).map_err(|e| ctx.raise(e))?;
                self.each(ctx, id, indices.into_iter().map(|i| &arr[i]), found)
            }

            NodeKind::Union(branches) => self.branches(ctx, branches, input, found),

            NodeKind::DescendantUnion(branches) => {
                if !input.is_container() {
                    return Ok(Status::NotFound);
                }
                let mut found = found;
                let mut status = Status::NotFound;
                for branch in branches {
                    let res = self.visit(ctx, Some(*branch), input, found.as_deref_mut(), 1, DESCENDANTS, true)?;
                    if res == Status::Ok {
                        if found.is_none() {
                            return Ok(Status::Ok);
                        }
                        status = Status::Ok;
                    }
                }
                Ok(status)
            }

            NodeKind::Filter(predicate) => {
                if unwrap && input.is_container() {
                    return self.any_item(ctx, Some(id), input, found, 1, CHILDREN, false);
                }
                match self.filter_truth(ctx, *predicate, input)? {
                    Truth::True => self.next(ctx, id, input, found),
                    _ => Ok(Status::NotFound),
                }
            }

            NodeKind::Binary { op, left, right } => {
                let a = self.single_number(ctx, *left, input, Side::Left, *op)?;
                let b = self.single_number(ctx, *right, input, Side::Right, *op)?;
                let result = arithmetic::binary(*op, &a, &b).map_err(|e| ctx.raise(e))?;
                self.next(ctx, id, &result, found)
            }

            NodeKind::Unary { op, arg } => {
                let mut seq = NodeList::new();
                self.exec(ctx, *arg, input, Some(&mut seq), true)?;
                let result = match seq.single() {
                    Some(v) if v.is_number() => arithmetic::unary(*op, v),
                    _ => {
                        return Err(ctx.raise(EvalError::UnaryNotSingleNumber { op: op.symbol() }));
                    }
                };
                self.next(ctx, id, &result, found)
            }

            NodeKind::Call { func, arg } => self.call(ctx, id, *func, *arg, input, found),

            // Boolean kinds were handled above
            NodeKind::Not(_) | NodeKind::Regex { .. } => Ok(Status::NotFound),
        }
    }

    /// Every branch against the same input, results in branch order.
    fn branches(
        &self,
        ctx: &EvalContext<'_>,
        branches: &RefList<NodeId>,
        input: &Value,
        mut found: Option<&mut NodeList>,
    ) -> Exec {
        let mut status = Status::NotFound;
        for branch in branches {
            if self.exec(ctx, *branch, input, found.as_deref_mut(), true)? == Status::Ok {
                if found.is_none() {
                    return Ok(Status::Ok);
                }
                status = Status::Ok;
            }
        }
        Ok(status)
    }

    /// Hands `value` to the continuation of `id`, or records it when the
    /// chain ends here.
    fn next(
        &self,
        ctx: &EvalContext<'_>,
        id: NodeId,
        value: &Value,
        found: Option<&mut NodeList>,
    ) -> Exec {
        match self.ast.continuation(id) {
            Some(next) => self.exec(ctx, next, value, found, true),
            None => {
                if let Some(found) = found {
                    found.push(value.clone())?;
                }
                Ok(Status::Ok)
            }
        }
    }

    /// Calls [`Engine::next`] for every value, stopping early once an
    /// existence check is satisfied.
    fn each<'v>(
        &self,
        ctx: &EvalContext<'_>,
        id: NodeId,
        values: impl IntoIterator<Item = &'v Value>,
        mut found: Option<&mut NodeList>,
    ) -> Exec {
        let mut status = Status::NotFound;
        for v in values {
            if self.next(ctx, id, v, found.as_deref_mut())? == Status::Ok {
                if found.is_none() {
                    return Ok(Status::Ok);
                }
                status = Status::Ok;
            }
        }
        Ok(status)
    }

    fn literal(
        &self,
        ctx: &EvalContext<'_>,
        id: NodeId,
        value: Value,
        found: Option<&mut NodeList>,
    ) -> Exec {
        if found.is_none() && self.ast.continuation(id).is_none() {
            return Ok(Status::Ok);
        }
        self.next(ctx, id, &value, found)
    }

    /// Booleans used as values: Unknown reads as false.
    fn append_bool(
        &self,
        ctx: &EvalContext<'_>,
        id: NodeId,
        truth: Truth,
        found: Option<&mut NodeList>,
    ) -> Exec {
        self.literal(ctx, id, Value::Boolean(truth == Truth::True), found)
    }

    // ========================================
    // Traversal
    // ========================================

    /// Visits every child of `container` as level `level`.
    #[allow(clippy::too_many_arguments)]
    fn any_item(
        &self,
        ctx: &EvalContext<'_>,
        step: Option<NodeId>,
        container: &Value,
        mut found: Option<&mut NodeList>,
        level: u32,
        window: Window,
        unwrap_next: bool,
    ) -> Exec {
        let mut status = Status::NotFound;
        for child in container.children() {
            let res = self.visit(ctx, step, child, found.as_deref_mut(), level, window, unwrap_next)?;
            if res == Status::Ok {
                if found.is_none() {
                    return Ok(Status::Ok);
                }
                status = Status::Ok;
            }
        }
        Ok(status)
    }

    /// Applies `step` to `value` when `level` is inside the window, then
    /// descends into its children while the window allows, in pre-order.
    ///
    /// Without a step the value itself is the result.
    #[allow(clippy::too_many_arguments)]
    fn visit(
        &self,
        ctx: &EvalContext<'_>,
        step: Option<NodeId>,
        value: &Value,
        mut found: Option<&mut NodeList>,
        level: u32,
        window: Window,
        unwrap_next: bool,
    ) -> Exec {
        let mut status = Status::NotFound;

        if level >= window.first && (!window.containers_only || value.is_container()) {
            let res = match (step, found.as_deref_mut()) {
                (Some(step), found) => self.exec(ctx, step, value, found, unwrap_next)?,
                (None, Some(list)) => {
                    list.push(value.clone())?;
                    Status::Ok
                }
                (None, None) => Status::Ok,
            };
            if res == Status::Ok {
                if found.is_none() {
                    return Ok(Status::Ok);
                }
                status = Status::Ok;
            }
        }

        if level < window.last && value.is_container() {
            let res = self.any_item(ctx, step, value, found, level + 1, window, unwrap_next)?;
            if res == Status::Ok {
                status = Status::Ok;
            }
        }

        Ok(status)
    }

    // ========================================
    // Predicates
    // ========================================

    /// Three-valued result of `id` evaluated against `input`.
    fn truth(&self, ctx: &EvalContext<'_>, id: NodeId, input: &Value) -> Result<Truth, EvalError> {
        match self.ast.kind(id) {
            NodeKind::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                let a = self.truth(ctx, *left, input)?;
                if a == Truth::False {
                    return Ok(Truth::False);
                }
                Ok(a.and(self.truth(ctx, *right, input)?))
            }
            NodeKind::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => {
                let a = self.truth(ctx, *left, input)?;
                if a == Truth::True {
                    return Ok(Truth::True);
                }
                Ok(a.or(self.truth(ctx, *right, input)?))
            }
            NodeKind::Binary { op, left, right } if op.is_comparison() => {
                let Some(lhs) = self.quiet_nodes(ctx, *left, input)? else {
                    return Ok(Truth::Unknown);
                };
                let Some(rhs) = self.quiet_nodes(ctx, *right, input)? else {
                    return Ok(Truth::Unknown);
                };
                Ok(compare_lists(*op, &lhs, &rhs))
            }
            NodeKind::Not(arg) => Ok(self.truth(ctx, *arg, input)?.not()),
            NodeKind::Regex { arg, regex, .. } => {
                let Some(seq) = self.quiet_nodes(ctx, *arg, input)? else {
                    return Ok(Truth::Unknown);
                };
                let mut unknown = false;
                for v in &seq {
                    match v {
                        Value::String(s) if regex.is_match(s) => return Ok(Truth::True),
                        Value::String(_) => {}
                        _ => unknown = true,
                    }
                }
                Ok(if unknown { Truth::Unknown } else { Truth::False })
            }
            NodeKind::Bool(b) => Ok(Truth::from_bool(*b)),
            NodeKind::Root | NodeKind::Current => {
                let exists = self.quiet(ctx, |q| self.exec(q, id, input, None, true))?;
                Ok(match exists {
                    Some(Status::Ok) => Truth::True,
                    Some(Status::NotFound) => Truth::False,
                    None => Truth::Unknown,
                })
            }
            other => {
                log::trace!("{other:?} is not a predicate, treating as unknown");
                Ok(Truth::Unknown)
            }
        }
    }

    /// Predicate of a filter, with `@` bound to `item`.
    fn filter_truth(
        &self,
        ctx: &EvalContext<'_>,
        predicate: NodeId,
        item: &Value,
    ) -> Result<Truth, EvalError> {
        let inner = ctx.with_current(item);
        self.truth(&inner, predicate, item)
    }

    // ========================================
    // No-throw evaluation
    // ========================================

    /// Runs `f` with errors suppressed. Non-fatal errors come back as `None`.
    fn quiet<T>(
        &self,
        ctx: &EvalContext<'_>,
        f: impl FnOnce(&EvalContext<'_>) -> Result<T, EvalError>,
    ) -> Result<Option<T>, EvalError> {
        match f(&ctx.quiet()) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                log::trace!("suppressed jsonpath evaluation error: {e}");
                Ok(None)
            }
        }
    }

    /// All nodes `id` yields, or `None` if evaluating it failed.
    fn quiet_nodes(
        &self,
        ctx: &EvalContext<'_>,
        id: NodeId,
        input: &Value,
    ) -> Result<Option<NodeList>, EvalError> {
        self.quiet(ctx, |q| {
            let mut seq = NodeList::new();
            self.exec(q, id, input, Some(&mut seq), true)?;
            Ok(seq)
        })
    }

    fn single_number(
        &self,
        ctx: &EvalContext<'_>,
        id: NodeId,
        input: &Value,
        side: Side,
        op: BinaryOp,
    ) -> Result<Value, EvalError> {
        let mut seq = NodeList::new();
        self.exec(ctx, id, input, Some(&mut seq), true)?;
        match seq.single() {
            Some(v) if v.is_number() => Ok(v.clone()),
            _ => Err(ctx.raise(EvalError::NotSingleNumber {
                side,
                op: op.symbol(),
            })),
        }
    }
}
