// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! gRPC frontend for the todo service.
//!
//! Implements the generated `todo.TodoService` server trait. Each call is
//! logged with its method, status code and elapsed time.

use std::time::Instant;

use tonic::{Code, Request, Response, Status};

use wirebench_core::proto::todo_service_server::{self, TodoServiceServer};
use wirebench_core::proto::{
    CreateTodoRequest, GetTodoRequest, ListTodosRequest, ListTodosResponse, Todo,
};
use wirebench_core::{filler_payload, PayloadKb, TodoError, TodoService};

/// gRPC handler wrapping the shared service.
#[derive(Debug, Clone)]
pub struct TodoGrpc {
    service: TodoService,
}

impl TodoGrpc {
    pub fn new(service: TodoService) -> Self {
        Self { service }
    }

    /// Wrap into the tonic service ready to be added to a server.
    pub fn into_server(self) -> TodoServiceServer<Self> {
        TodoServiceServer::new(self)
    }

    fn create(&self, req: CreateTodoRequest) -> Result<Todo, Status> {
        let payload = payload_for(req.payload_kb)?;

        let item = self.service.create(&req.title, req.done).map_err(to_status)?;
        let mut msg = Todo::from(item);
        msg.payload = payload;
        Ok(msg)
    }

    fn get(&self, req: GetTodoRequest) -> Result<Todo, Status> {
        let item = self.service.get(req.id).map_err(to_status)?;
        Ok(item.into())
    }

    fn list(&self, req: ListTodosRequest) -> Result<ListTodosResponse, Status> {
        let payload = payload_for(req.payload_kb)?;
        if req.limit < 0 || req.offset < 0 {
            return Err(Status::invalid_argument("invalid pagination"));
        }

        let items = self
            .service
            .list(i64::from(req.limit), i64::from(req.offset))
            .map_err(to_status)?;

        let items = items
            .into_iter()
            .map(|item| {
                let mut msg = Todo::from(item);
                if !payload.is_empty() {
                    msg.payload = payload.clone();
                }
                msg
            })
            .collect();

        Ok(ListTodosResponse { items })
    }
}

#[tonic::async_trait]
impl todo_service_server::TodoService for TodoGrpc {
    async fn create_todo(
        &self,
        request: Request<CreateTodoRequest>,
    ) -> Result<Response<Todo>, Status> {
        let start = Instant::now();
        let result = self.create(request.into_inner());
        log_call("CreateTodo", start, &result);
        result.map(Response::new)
    }

    async fn get_todo(&self, request: Request<GetTodoRequest>) -> Result<Response<Todo>, Status> {
        let start = Instant::now();
        let result = self.get(request.into_inner());
        log_call("GetTodo", start, &result);
        result.map(Response::new)
    }

    async fn list_todos(
        &self,
        request: Request<ListTodosRequest>,
    ) -> Result<Response<ListTodosResponse>, Status> {
        let start = Instant::now();
        let result = self.list(request.into_inner());
        log_call("ListTodos", start, &result);
        result.map(Response::new)
    }
}

/// Filler for a requested size; negative sizes are rejected.
fn payload_for(kb: i32) -> Result<String, Status> {
    PayloadKb::new(i64::from(kb))
        .ok()
        .and_then(filler_payload)
        .ok_or_else(|| Status::invalid_argument("invalid payload_kb"))
}

/// Map service errors onto client-error status codes.
fn to_status(err: TodoError) -> Status {
    match err {
        TodoError::InvalidInput => Status::invalid_argument("invalid input"),
        TodoError::NotFound => Status::not_found("not found"),
    }
}

fn log_call<T>(method: &'static str, start: Instant, result: &Result<T, Status>) {
    let code = match result {
        Ok(_) => Code::Ok,
        Err(status) => status.code(),
    };
    let elapsed_us = start.elapsed().as_micros() as u64;

    if code == Code::Internal {
        tracing::error!(method, code = ?code, elapsed_us, "gRPC call failed");
    } else {
        tracing::debug!(method, code = ?code, elapsed_us, "gRPC call");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_service_server::TodoService as _;

    fn handler() -> TodoGrpc {
        TodoGrpc::new(TodoService::new())
    }

    #[tokio::test]
    async fn test_list_empty() {
        let grpc = handler();
        let resp = grpc
            .list_todos(Request::new(ListTodosRequest {
                limit: 10,
                offset: 0,
                payload_kb: 0,
            }))
            .await
            .unwrap();
        assert!(resp.into_inner().items.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let grpc = handler();
        let created = grpc
            .create_todo(Request::new(CreateTodoRequest {
                title: "buy milk".to_string(),
                done: false,
                payload_kb: 0,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(created.id, 1);
        assert!(created.payload.is_empty());

        let fetched = grpc
            .get_todo(Request::new(GetTodoRequest { id: 1 }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(fetched.title, "buy milk");
        assert!(!fetched.done);
    }

    #[tokio::test]
    async fn test_create_with_payload() {
        let grpc = handler();
        let created = grpc
            .create_todo(Request::new(CreateTodoRequest {
                title: "big".to_string(),
                done: true,
                payload_kb: 2,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(created.payload.len(), 2048);

        // The payload is not stored, only attached to the response.
        let fetched = grpc
            .get_todo(Request::new(GetTodoRequest { id: created.id }))
            .await
            .unwrap()
            .into_inner();
        assert!(fetched.payload.is_empty());
    }

    #[tokio::test]
    async fn test_list_attaches_payload() {
        let grpc = handler();
        for title in ["a", "b", "c"] {
            grpc.service.create(title, false).unwrap();
        }

        let items = grpc
            .list_todos(Request::new(ListTodosRequest {
                limit: 2,
                offset: 0,
                payload_kb: 1,
            }))
            .await
            .unwrap()
            .into_inner()
            .items;
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|t| t.payload.len() == 1024));
    }

    #[tokio::test]
    async fn test_error_codes() {
        let grpc = handler();

        let err = grpc
            .get_todo(Request::new(GetTodoRequest { id: 0 }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);

        let err = grpc
            .get_todo(Request::new(GetTodoRequest { id: 5 }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::NotFound);

        let err = grpc
            .create_todo(Request::new(CreateTodoRequest {
                title: String::new(),
                done: false,
                payload_kb: 0,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);

        let err = grpc
            .list_todos(Request::new(ListTodosRequest {
                limit: -1,
                offset: 0,
                payload_kb: 0,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert_eq!(err.message(), "invalid pagination");

        let err = grpc
            .list_todos(Request::new(ListTodosRequest {
                limit: 1,
                offset: 0,
                payload_kb: -1,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert_eq!(err.message(), "invalid payload_kb");
    }
}
