// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations.
//!
//! Each mutating operation follows the same order: authorize the role,
//! read the current value, check the department scope, compute the
//! transition in core, commit it with a conditional write, then deliver
//! notifications. Nothing is delivered for a transition that did not
//! commit, and a delivery failure never undoes one.

use gudang::{
    BatchPlan, Command, CreatePlan, TransitionContext, TransitionResult, apply, batch_fulfilled,
    plan_batch, plan_create,
};
use gudang_domain::{
    Actor, ActorId, BatchId, BatchStatus, Department, DepartmentCategory, DeptCode, DocNumber,
    Item, ItemId, LineItem, PickupBatch, Request, RequestId, RequestStatus, Role, Scope,
    ScopeRules, validate_item_fields, validate_rejection_reason,
};
use gudang_notify::Notification;
use gudang_persistence::{
    ActorRecord, HandOverRecord, Persistence, PersistenceError, RequestFilter, StoredNotification,
};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::auth::AuthorizationService;
use crate::context::ApiContext;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    ApproveRequest, BulkApproveRequest, BulkFailure, BulkOutcome, BulkRejectRequest,
    CreateBatchRequest, CreateItemRequest, CreateRequestRequest, DocNumberParts,
    FormatDocNumberRequest, HandOverOutcome, HandOverRequest, HandedOver, ItemView, LineItemView,
    ListRequestsQuery, NotificationView, ReceiveStockRequest, RegisterActorRequest,
    RegisterDepartmentRequest, RejectRequest, RequestCounts, RequestView, StatusCount,
    UpdateItemRequest,
};

// ============================================================================
// Helpers
// ============================================================================

fn not_found(resource_type: &str, message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message,
    }
}

fn parse_dept(code: &str) -> Result<DeptCode, ApiError> {
    DeptCode::new(code).map_err(translate_domain_error)
}

fn load_request(persistence: &mut Persistence, request_id: RequestId) -> Result<Request, ApiError> {
    persistence
        .get_request(request_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("Request", format!("Request {request_id} does not exist")))
}

fn load_item(persistence: &mut Persistence, item_id: ItemId) -> Result<Item, ApiError> {
    persistence
        .get_item(item_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("Item", format!("Item {item_id} does not exist")))
}

fn hrga_recipients(persistence: &mut Persistence) -> Result<Vec<ActorId>, ApiError> {
    persistence
        .list_actor_ids_by_role(Role::Hrga)
        .map_err(translate_persistence_error)
}

/// Stores and emits committed notifications.
///
/// Best-effort: failures are logged and swallowed.
fn deliver(persistence: &mut Persistence, ctx: &ApiContext, notifications: &[Notification]) {
    let now = ctx.now();
    for notification in notifications {
        if let Err(e) = persistence.insert_notification(notification, now) {
            warn!(
                user_id = %notification.user_id,
                error = %e,
                "Failed to store notification"
            );
        }
        if let Err(e) = ctx.sink.emit(notification) {
            warn!(
                user_id = %notification.user_id,
                error = %e,
                "Failed to emit notification"
            );
        }
    }
}

/// Resolves an actor id presented by the session layer.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` for a blank or unknown id.
pub fn authenticate(persistence: &mut Persistence, actor_id: &str) -> Result<Actor, ApiError> {
    let id: ActorId = ActorId::new(actor_id).map_err(|e| ApiError::AuthenticationFailed {
        reason: e.to_string(),
    })?;
    let record: ActorRecord = persistence
        .get_actor(&id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::AuthenticationFailed {
            reason: format!("unknown actor '{id}'"),
        })?;
    Ok(record.actor)
}

// ============================================================================
// Scope
// ============================================================================

/// Resolves the departments an actor may view and act on.
///
/// Category admins derive their scope from the stored department catalogue;
/// supervisors are widened by the configured rules.
///
/// # Errors
///
/// Returns an error if the department catalogue cannot be read.
pub fn resolve_scope(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
) -> Result<Scope, ApiError> {
    let departments: Vec<Department> = persistence
        .list_departments()
        .map_err(translate_persistence_error)?;
    let rules: ScopeRules = ScopeRules::new(&departments, ctx.widenings.clone());
    let scope: Scope = rules.resolve(actor);
    debug!(actor = %actor.id, role = %actor.role, ?scope, "Resolved scope");
    Ok(scope)
}

// ============================================================================
// Request lifecycle
// ============================================================================

/// Submits a new request for a department.
///
/// The document number is allocated only once everything else has been
/// validated, so a rejected call never consumes one.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not a requester, or the department is outside its scope
///   (checked before the department's existence)
/// - The department or an item does not exist
/// - There are no line items, or a line is invalid
pub fn create_request(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    request: CreateRequestRequest,
) -> Result<Request, ApiError> {
    AuthorizationService::authorize_requester(actor)?;

    // Scope before existence: an unknown code outside scope is Unauthorized.
    let dept_code: DeptCode = parse_dept(&request.dept_code)?;
    let scope: Scope = resolve_scope(persistence, ctx, actor)?;
    AuthorizationService::authorize_create_request(actor, &scope, &dept_code)?;
    if persistence
        .get_department(&dept_code)
        .map_err(translate_persistence_error)?
        .is_none()
    {
        return Err(not_found(
            "Department",
            format!("Department '{dept_code}' does not exist"),
        ));
    }

    let items: Vec<LineItem> = request
        .items
        .iter()
        .map(|line| LineItem::new(ItemId::new(line.item_id), line.quantity))
        .collect();
    let plan: CreatePlan = plan_create(
        actor.id.clone(),
        dept_code,
        items,
        request.admin_signature,
        ctx.now(),
    )
    .map_err(translate_core_error)?;
    ensure_items_exist(persistence, &plan.items)?;

    let created: Request = persistence
        .insert_request(&plan)
        .map_err(translate_persistence_error)?;
    info!(
        request_id = created.id().value(),
        doc_number = %created.doc_number(),
        actor = %actor.id,
        "Request submitted"
    );
    Ok(created)
}

fn ensure_items_exist(persistence: &mut Persistence, lines: &[LineItem]) -> Result<(), ApiError> {
    let ids: Vec<ItemId> = lines.iter().map(|l| l.item_id).collect();
    let known: BTreeSet<ItemId> = persistence
        .get_items(&ids)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|item| item.id)
        .collect();
    match ids.iter().find(|id| !known.contains(id)) {
        Some(missing) => Err(not_found("Item", format!("Item {missing} does not exist"))),
        None => Ok(()),
    }
}

/// Applies a supervisor decision to one request and commits it.
fn decide(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    scope: &Scope,
    hrga: &[ActorId],
    request_id: RequestId,
    command: Command,
) -> Result<Request, ApiError> {
    let action: &'static str = command.name();
    let current: Request = load_request(persistence, request_id)?;
    AuthorizationService::authorize_department(action, scope, current.dept_code())?;

    let transition_ctx: TransitionContext =
        TransitionContext::new(actor.id.clone(), hrga.to_vec(), ctx.now());
    let result: TransitionResult = apply(&current, command, &transition_ctx).map_err(|e| {
        debug!(request_id = request_id.value(), action, error = %e, "Transition refused");
        translate_core_error(e)
    })?;

    persistence
        .save_transition(current.status(), &result.request)
        .map_err(translate_persistence_error)?;
    info!(
        request_id = request_id.value(),
        doc_number = %result.request.doc_number(),
        action,
        from = current.status().as_str(),
        to = result.request.status().as_str(),
        actor = %actor.id,
        "Request transitioned"
    );

    deliver(persistence, ctx, &result.notifications);
    Ok(result.request)
}

/// Approves a pending request.
///
/// Notifies the requester and every HRGA user.
///
/// # Errors
///
/// Returns an error if the actor is not a supervisor for the request's
/// department, the request does not exist, or it is not pending.
pub fn approve_request(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    request_id: i64,
    request: ApproveRequest,
) -> Result<Request, ApiError> {
    AuthorizationService::authorize_decision(actor, "approve")?;
    let scope: Scope = resolve_scope(persistence, ctx, actor)?;
    let hrga: Vec<ActorId> = hrga_recipients(persistence)?;
    decide(
        persistence,
        ctx,
        actor,
        &scope,
        &hrga,
        RequestId::new(request_id),
        Command::Approve {
            supervisor_signature: request.supervisor_signature,
        },
    )
}

/// Approves several requests, each independently.
///
/// A request that fails its own checks is reported in `failed`; the others
/// are still approved.
///
/// # Errors
///
/// Returns an error only if the actor is not a supervisor.
pub fn approve_requests_bulk(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    request: BulkApproveRequest,
) -> Result<BulkOutcome, ApiError> {
    AuthorizationService::authorize_decision(actor, "approve")?;
    let scope: Scope = resolve_scope(persistence, ctx, actor)?;
    let hrga: Vec<ActorId> = hrga_recipients(persistence)?;

    let mut outcome: BulkOutcome = BulkOutcome::default();
    for raw_id in request.request_ids {
        let command: Command = Command::Approve {
            supervisor_signature: request.supervisor_signature.clone(),
        };
        match decide(
            persistence,
            ctx,
            actor,
            &scope,
            &hrga,
            RequestId::new(raw_id),
            command,
        ) {
            Ok(approved) => outcome.succeeded.push(approved),
            Err(error) => outcome.failed.push(BulkFailure {
                request_id: raw_id,
                error,
            }),
        }
    }

    info!(
        actor = %actor.id,
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Bulk approve finished"
    );
    Ok(outcome)
}

/// Rejects a pending request with a reason.
///
/// # Errors
///
/// Returns an error if the reason is blank, the actor is not a supervisor
/// for the request's department, the request does not exist, or it is not
/// pending.
pub fn reject_request(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    request_id: i64,
    request: RejectRequest,
) -> Result<Request, ApiError> {
    AuthorizationService::authorize_decision(actor, "reject")?;
    let reason: String =
        validate_rejection_reason(&request.reason).map_err(translate_domain_error)?;
    let scope: Scope = resolve_scope(persistence, ctx, actor)?;
    decide(
        persistence,
        ctx,
        actor,
        &scope,
        &[],
        RequestId::new(request_id),
        Command::Reject { reason },
    )
}

/// Rejects several requests with one reason, each independently.
///
/// # Errors
///
/// Returns an error only if the actor is not a supervisor or the reason is
/// blank.
pub fn reject_requests_bulk(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    request: BulkRejectRequest,
) -> Result<BulkOutcome, ApiError> {
    AuthorizationService::authorize_decision(actor, "reject")?;
    let reason: String =
        validate_rejection_reason(&request.reason).map_err(translate_domain_error)?;
    let scope: Scope = resolve_scope(persistence, ctx, actor)?;

    let mut outcome: BulkOutcome = BulkOutcome::default();
    for raw_id in request.request_ids {
        let command: Command = Command::Reject {
            reason: reason.clone(),
        };
        match decide(
            persistence,
            ctx,
            actor,
            &scope,
            &[],
            RequestId::new(raw_id),
            command,
        ) {
            Ok(rejected) => outcome.succeeded.push(rejected),
            Err(error) => outcome.failed.push(BulkFailure {
                request_id: raw_id,
                error,
            }),
        }
    }

    info!(
        actor = %actor.id,
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Bulk reject finished"
    );
    Ok(outcome)
}

// ============================================================================
// Batches and hand-over
// ============================================================================

/// Creates a pickup batch from approved requests.
///
/// All or nothing: if any member is ineligible, no batch is created and no
/// request changes. One summary notification goes to every HRGA user.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` unless the actor is HRGA, and
/// `ApiError::InvalidMembership` if the list is empty or any member is
/// unknown, not `approved_spv`, already batched or listed twice.
pub fn create_batch(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    request: CreateBatchRequest,
) -> Result<PickupBatch, ApiError> {
    AuthorizationService::authorize_hrga(actor, "create_batch")?;

    let ids: Vec<RequestId> = request
        .request_ids
        .iter()
        .copied()
        .map(RequestId::new)
        .collect();
    // Deduplicated for loading; duplicates are still caught by planning.
    let unique: Vec<RequestId> = ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let loaded: BTreeMap<RequestId, Request> = persistence
        .get_requests(&unique)
        .map_err(|e| match e {
            PersistenceError::NotFound(message) => ApiError::InvalidMembership { message },
            other => translate_persistence_error(other),
        })?
        .into_iter()
        .map(|r| (r.id(), r))
        .collect();
    let members: Vec<Request> = ids
        .iter()
        .filter_map(|id| loaded.get(id).cloned())
        .collect();

    let transition_ctx: TransitionContext =
        TransitionContext::new(actor.id.clone(), hrga_recipients(persistence)?, ctx.now());
    let plan: BatchPlan =
        plan_batch(&members, request.schedule_datetime, &transition_ctx).map_err(|e| {
            debug!(actor = %actor.id, error = %e, "Batch refused");
            translate_core_error(e)
        })?;

    let batch: PickupBatch = persistence.insert_batch(&plan).map_err(|e| match e {
        PersistenceError::StaleState { .. } => ApiError::InvalidMembership {
            message: e.to_string(),
        },
        other => translate_persistence_error(other),
    })?;

    deliver(persistence, ctx, &plan.notifications(batch.id));
    Ok(batch)
}

/// Hands over one or more requests, each independently.
///
/// Every line decrements stock floored at zero. When the last outstanding
/// member of a batch is handed over, the batch is marked fulfilled.
///
/// # Errors
///
/// Returns an error only if the actor is not HRGA.
pub fn hand_over(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    request: HandOverRequest,
) -> Result<HandOverOutcome, ApiError> {
    AuthorizationService::authorize_hrga(actor, "hand_over")?;

    let mut outcome: HandOverOutcome = HandOverOutcome::default();
    let mut touched: BTreeSet<BatchId> = BTreeSet::new();
    for raw_id in request.request_ids {
        match hand_over_one(persistence, ctx, actor, RequestId::new(raw_id)) {
            Ok(handed) => {
                if let Some(batch_id) = handed.request.batch_id() {
                    touched.insert(batch_id);
                }
                outcome.succeeded.push(handed);
            }
            Err(error) => outcome.failed.push(BulkFailure {
                request_id: raw_id,
                error,
            }),
        }
    }

    for batch_id in touched {
        match settle_batch(persistence, batch_id) {
            Ok(true) => outcome.fulfilled_batches.push(batch_id),
            Ok(false) => {}
            Err(e) => warn!(
                batch_id = batch_id.value(),
                error = %e,
                "Failed to update batch status after hand-over"
            ),
        }
    }

    info!(
        actor = %actor.id,
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        fulfilled_batches = outcome.fulfilled_batches.len(),
        "Hand-over finished"
    );
    Ok(outcome)
}

fn hand_over_one(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    request_id: RequestId,
) -> Result<HandedOver, ApiError> {
    let current: Request = load_request(persistence, request_id)?;
    let transition_ctx: TransitionContext =
        TransitionContext::new(actor.id.clone(), Vec::new(), ctx.now());
    let result: TransitionResult =
        apply(&current, Command::HandOver, &transition_ctx).map_err(translate_core_error)?;

    let record: HandOverRecord = persistence
        .complete_request(current.status(), &result.request, &result.stock_adjustments)
        .map_err(translate_persistence_error)?;
    info!(
        request_id = request_id.value(),
        doc_number = %result.request.doc_number(),
        shortages = record.shortages.len(),
        actor = %actor.id,
        "Request handed over"
    );

    deliver(persistence, ctx, &result.notifications);
    Ok(HandedOver {
        request: result.request,
        shortages: record.shortages,
    })
}

/// Marks a batch fulfilled once all of its members are completed.
fn settle_batch(persistence: &mut Persistence, batch_id: BatchId) -> Result<bool, ApiError> {
    let Some(batch) = persistence
        .get_batch(batch_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(false);
    };
    let members: Vec<Request> = persistence
        .list_requests(&RequestFilter {
            batch_id: Some(batch_id),
            ..RequestFilter::default()
        })
        .map_err(translate_persistence_error)?;
    if !batch_fulfilled(&members) {
        return Ok(false);
    }
    let Ok(fulfilled) = batch.mark_fulfilled() else {
        return Ok(false);
    };
    persistence
        .mark_batch_fulfilled(fulfilled.id)
        .map_err(translate_persistence_error)
}

/// Retrieves a pickup batch.
///
/// # Errors
///
/// Returns an error unless the actor is HRGA, or if the batch does not
/// exist.
pub fn get_batch(
    persistence: &mut Persistence,
    actor: &Actor,
    batch_id: i64,
) -> Result<PickupBatch, ApiError> {
    AuthorizationService::authorize_hrga(actor, "get_batch")?;
    let batch_id: BatchId = BatchId::new(batch_id);
    persistence
        .get_batch(batch_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| not_found("Batch", format!("Batch {batch_id} does not exist")))
}

/// Lists pickup batches by schedule, optionally filtered by status.
///
/// # Errors
///
/// Returns an error unless the actor is HRGA, or if the status is unknown.
pub fn list_batches(
    persistence: &mut Persistence,
    actor: &Actor,
    status: Option<&str>,
) -> Result<Vec<PickupBatch>, ApiError> {
    AuthorizationService::authorize_hrga(actor, "list_batches")?;
    let status: Option<BatchStatus> = status
        .map(BatchStatus::from_str)
        .transpose()
        .map_err(translate_domain_error)?;
    persistence
        .list_batches(status)
        .map_err(translate_persistence_error)
}

// ============================================================================
// Read models
// ============================================================================

/// Retrieves a request within the actor's scope.
///
/// # Errors
///
/// Returns an error if the request does not exist or lies outside the
/// actor's scope.
pub fn get_request(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    request_id: i64,
) -> Result<RequestView, ApiError> {
    let request: Request = load_request(persistence, RequestId::new(request_id))?;
    let scope: Scope = resolve_scope(persistence, ctx, actor)?;
    AuthorizationService::authorize_department("get_request", &scope, request.dept_code())?;
    let mut views: Vec<RequestView> = build_views(persistence, vec![request])?;
    views
        .pop()
        .ok_or_else(|| ApiError::Internal {
            message: String::from("request view missing"),
        })
}

/// Lists requests within the actor's scope, newest first.
///
/// # Errors
///
/// Returns an error if the status filter is unknown or storage fails.
pub fn list_requests(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
    query: &ListRequestsQuery,
) -> Result<Vec<RequestView>, ApiError> {
    let status: Option<RequestStatus> = query
        .status
        .as_deref()
        .map(RequestStatus::from_str)
        .transpose()
        .map_err(translate_domain_error)?;
    let scope: Scope = resolve_scope(persistence, ctx, actor)?;

    let filter: RequestFilter = RequestFilter {
        departments: scope.departments().cloned(),
        status,
        batch_id: None,
    };
    let requests: Vec<Request> = persistence
        .list_requests(&filter)
        .map_err(translate_persistence_error)?;
    build_views(persistence, requests)
}

/// Counts requests per status within the actor's scope.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn request_counts(
    persistence: &mut Persistence,
    ctx: &ApiContext,
    actor: &Actor,
) -> Result<RequestCounts, ApiError> {
    let scope: Scope = resolve_scope(persistence, ctx, actor)?;
    let counts: BTreeMap<RequestStatus, u64> = persistence
        .count_requests_by_status(scope.departments())
        .map_err(translate_persistence_error)?;
    let total: u64 = counts.values().sum();
    Ok(RequestCounts {
        counts: RequestStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: counts.get(status).copied().unwrap_or(0),
            })
            .collect(),
        total,
    })
}

fn build_views(
    persistence: &mut Persistence,
    requests: Vec<Request>,
) -> Result<Vec<RequestView>, ApiError> {
    let departments: BTreeMap<DeptCode, String> = persistence
        .list_departments()
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|d| (d.code, d.name))
        .collect();

    let item_ids: Vec<ItemId> = requests
        .iter()
        .flat_map(|r| r.items().iter().map(|line| line.item_id))
        .collect::<BTreeSet<ItemId>>()
        .into_iter()
        .collect();
    let items: BTreeMap<ItemId, Item> = persistence
        .get_items(&item_ids)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    let mut requesters: BTreeMap<ActorId, String> = BTreeMap::new();
    for request in &requests {
        if requesters.contains_key(request.requester_id()) {
            continue;
        }
        let name: String = persistence
            .get_actor(request.requester_id())
            .map_err(translate_persistence_error)?
            .map_or_else(|| request.requester_id().to_string(), |r| r.display_name);
        requesters.insert(request.requester_id().clone(), name);
    }

    requests
        .into_iter()
        .map(|request| to_view(request, &departments, &requesters, &items))
        .collect()
}

fn to_view(
    request: Request,
    departments: &BTreeMap<DeptCode, String>,
    requesters: &BTreeMap<ActorId, String>,
    items: &BTreeMap<ItemId, Item>,
) -> Result<RequestView, ApiError> {
    let lines: Vec<LineItemView> = request
        .items()
        .iter()
        .map(|line| {
            items
                .get(&line.item_id)
                .map(|item| LineItemView {
                    item_id: item.id.value(),
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    unit: item.unit.clone(),
                    quantity: line.quantity,
                })
                .ok_or_else(|| ApiError::Internal {
                    message: format!(
                        "item {} of request {} is missing",
                        line.item_id,
                        request.id()
                    ),
                })
        })
        .collect::<Result<Vec<LineItemView>, ApiError>>()?;

    Ok(RequestView {
        id: request.id().value(),
        doc_number: request.doc_number().to_string(),
        dept_code: request.dept_code().to_string(),
        department_name: departments
            .get(request.dept_code())
            .cloned()
            .unwrap_or_default(),
        requester_id: request.requester_id().to_string(),
        requester_name: requesters
            .get(request.requester_id())
            .cloned()
            .unwrap_or_default(),
        status: request.status(),
        rejection_reason: request.rejection_reason().map(str::to_string),
        admin_signature: request.admin_signature().map(str::to_string),
        supervisor_signature: request.supervisor_signature().map(str::to_string),
        batch_id: request.batch_id().map(|b| b.value()),
        items: lines,
        created_at: request.created_at(),
        updated_at: request.updated_at(),
    })
}

// ============================================================================
// Document numbers
// ============================================================================

/// Formats a document number from its parts.
///
/// # Errors
///
/// Returns `ApiError::InvalidMonth` for a month outside `1..=12`, and
/// `ApiError::InvalidInput` for a zero sequence, a bad department code or
/// a year without four digits.
pub fn format_doc_number(request: &FormatDocNumberRequest) -> Result<String, ApiError> {
    let dept_code: DeptCode = parse_dept(&request.dept_code)?;
    gudang_domain::format_doc_number(request.sequence, &dept_code, request.month, request.year)
        .map_err(translate_domain_error)
}

/// Parses a document number. Returns `None` for anything not canonical.
#[must_use]
pub fn parse_doc_number(text: &str) -> Option<DocNumberParts> {
    gudang_domain::parse_doc_number(text).map(|doc: DocNumber| DocNumberParts {
        sequence: doc.sequence(),
        dept_code: doc.dept_code().to_string(),
        month: doc.month_number(),
        year: doc.year(),
    })
}

// ============================================================================
// Items
// ============================================================================

/// Creates an item.
///
/// # Errors
///
/// Returns an error unless the actor is HRGA, if a field is blank, or if
/// the SKU is taken.
pub fn create_item(
    persistence: &mut Persistence,
    actor: &Actor,
    request: CreateItemRequest,
) -> Result<ItemView, ApiError> {
    AuthorizationService::authorize_hrga(actor, "create_item")?;
    validate_item_fields(&request.sku, &request.name, &request.unit)
        .map_err(translate_domain_error)?;

    let item: Item = persistence
        .insert_item(
            request.sku.trim(),
            request.name.trim(),
            request.unit.trim(),
            request.min_stock,
            request.initial_stock,
        )
        .map_err(|e| match e {
            PersistenceError::Duplicate(_) => ApiError::InvalidInput {
                field: String::from("sku"),
                message: format!("SKU '{}' already exists", request.sku.trim()),
            },
            other => translate_persistence_error(other),
        })?;
    info!(item_id = item.id.value(), sku = %item.sku, actor = %actor.id, "Item created");
    Ok(ItemView::from(item))
}

/// Edits an item's name, unit and low-stock threshold.
///
/// # Errors
///
/// Returns an error unless the actor is HRGA, if the item does not exist,
/// or if a field is blank.
pub fn update_item(
    persistence: &mut Persistence,
    actor: &Actor,
    item_id: i64,
    request: UpdateItemRequest,
) -> Result<ItemView, ApiError> {
    AuthorizationService::authorize_hrga(actor, "update_item")?;
    let existing: Item = load_item(persistence, ItemId::new(item_id))?;
    validate_item_fields(&existing.sku, &request.name, &request.unit)
        .map_err(translate_domain_error)?;

    let item: Item = persistence
        .update_item(
            existing.id,
            request.name.trim(),
            request.unit.trim(),
            request.min_stock,
        )
        .map_err(translate_persistence_error)?;
    info!(item_id, actor = %actor.id, "Item updated");
    Ok(ItemView::from(item))
}

/// Records an incoming-stock receipt.
///
/// # Errors
///
/// Returns an error unless the actor is HRGA, if the quantity is zero, or
/// if the item does not exist.
pub fn receive_stock(
    persistence: &mut Persistence,
    actor: &Actor,
    item_id: i64,
    request: ReceiveStockRequest,
) -> Result<ItemView, ApiError> {
    AuthorizationService::authorize_hrga(actor, "receive_stock")?;
    if request.quantity == 0 {
        return Err(ApiError::InvalidInput {
            field: String::from("quantity"),
            message: String::from("received quantity must be positive"),
        });
    }
    let existing: Item = load_item(persistence, ItemId::new(item_id))?;
    let item: Item = persistence
        .receive_stock(existing.id, request.quantity)
        .map_err(translate_persistence_error)?;
    Ok(ItemView::from(item))
}

/// Lists items by SKU.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn list_items(persistence: &mut Persistence) -> Result<Vec<ItemView>, ApiError> {
    Ok(persistence
        .list_items(false)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(ItemView::from)
        .collect())
}

/// Lists items at or below their minimum stock.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn low_stock_items(persistence: &mut Persistence) -> Result<Vec<ItemView>, ApiError> {
    Ok(persistence
        .list_items(true)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(ItemView::from)
        .collect())
}

// ============================================================================
// Setup
// ============================================================================

/// Registers a department. Codes are immutable once registered.
///
/// # Errors
///
/// Returns an error if the code or category is invalid, the name is blank,
/// or the code is taken.
pub fn register_department(
    persistence: &mut Persistence,
    request: RegisterDepartmentRequest,
) -> Result<Department, ApiError> {
    let code: DeptCode = parse_dept(&request.code)?;
    let category: DepartmentCategory =
        DepartmentCategory::from_str(&request.category).map_err(translate_domain_error)?;
    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("department name cannot be empty"),
        });
    }

    let department: Department = Department::new(code, request.name.trim().to_string(), category);
    persistence
        .insert_department(&department)
        .map_err(translate_persistence_error)?;
    info!(
        dept_code = %department.code,
        category = department.category.as_str(),
        "Department registered"
    );
    Ok(department)
}

/// Registers an actor with its department assignments.
///
/// A department-bound role without any department is accepted and
/// resolves to an empty scope.
///
/// # Errors
///
/// Returns an error if the id, role or a department code is invalid, a
/// department is unknown, or the id is taken.
pub fn register_actor(
    persistence: &mut Persistence,
    request: RegisterActorRequest,
) -> Result<Actor, ApiError> {
    let id: ActorId = ActorId::new(&request.actor_id).map_err(translate_domain_error)?;
    let role: Role = Role::from_str(&request.role).map_err(translate_domain_error)?;

    let mut actor: Actor = Actor::new(id, role);
    if let Some(primary) = request.primary_department.as_deref() {
        actor = actor.with_primary_department(parse_dept(primary)?);
    }
    for code in &request.departments {
        actor = actor.with_department(parse_dept(code)?);
    }
    if role.is_department_bound() && actor.assigned_departments().is_empty() {
        warn!(
            actor = %actor.id,
            role = %role,
            "Registering department-bound actor without departments"
        );
    }

    persistence
        .insert_actor(&actor, request.display_name.trim())
        .map_err(translate_persistence_error)?;
    info!(actor = %actor.id, role = %role, "Actor registered");
    Ok(actor)
}

// ============================================================================
// Notifications
// ============================================================================

/// Lists the actor's notifications, newest first.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn list_notifications(
    persistence: &mut Persistence,
    actor: &Actor,
    unread_only: bool,
) -> Result<Vec<NotificationView>, ApiError> {
    let stored: Vec<StoredNotification> = persistence
        .list_notifications(&actor.id, unread_only)
        .map_err(translate_persistence_error)?;
    Ok(stored
        .into_iter()
        .map(|n| NotificationView {
            id: n.notification_id,
            message: n.message,
            link: n.link,
            is_read: n.is_read,
            created_at: n.created_at,
        })
        .collect())
}

/// Counts the actor's unread notifications.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn count_unread_notifications(
    persistence: &mut Persistence,
    actor: &Actor,
) -> Result<u64, ApiError> {
    persistence
        .count_unread_notifications(&actor.id)
        .map_err(translate_persistence_error)
}

/// Marks one of the actor's notifications read.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the notification is not the
/// actor's.
pub fn mark_notification_read(
    persistence: &mut Persistence,
    actor: &Actor,
    notification_id: i64,
) -> Result<(), ApiError> {
    if persistence
        .mark_notification_read(&actor.id, notification_id)
        .map_err(translate_persistence_error)?
    {
        Ok(())
    } else {
        Err(not_found(
            "Notification",
            format!("Notification {notification_id} does not exist"),
        ))
    }
}

/// Marks all of the actor's notifications read, returning how many changed.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn mark_all_notifications_read(
    persistence: &mut Persistence,
    actor: &Actor,
) -> Result<usize, ApiError> {
    persistence
        .mark_all_notifications_read(&actor.id)
        .map_err(translate_persistence_error)
}
