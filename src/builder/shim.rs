//! Emission of the reflection-based glue source.
//!
//! The generated message class exposes no stable entry points of its own,
//! so the builder emits a small C++ shim next to it. The shim exports the
//! three-symbol module ABI and maps string-keyed field assignments onto
//! libprotobuf's reflection API, with all text-to-value coercion on the
//! module side of the boundary.
//!
//! ABI ownership rules (forced by the fixed three-symbol contract, which
//! leaves no room for destroy/free exports): the module owns exactly one
//! message instance, reset on every `protoforge_construct` call, and the
//! serialized buffer returned by `protoforge_serialize` stays valid only
//! until the next serialize call or unload — the host copies immediately.

/// Placeholder replaced with the fully-qualified message name.
const MESSAGE_NAME_SLOT: &str = "__MESSAGE_FULL_NAME__";

const SHIM_TEMPLATE: &str = r#"// Generated glue. Do not edit.
#include <cstddef>
#include <cstdint>
#include <exception>
#include <memory>
#include <string>

#include <google/protobuf/descriptor.h>
#include <google/protobuf/message.h>

#include "schema.pb.h"

namespace {

std::unique_ptr<google::protobuf::Message> g_instance;
std::string g_wire;

bool assign_field(google::protobuf::Message &message,
                  const google::protobuf::FieldDescriptor *field,
                  const std::string &text) {
    const google::protobuf::Reflection *reflection = message.GetReflection();
    try {
        switch (field->cpp_type()) {
            case google::protobuf::FieldDescriptor::CPPTYPE_INT32:
                reflection->SetInt32(&message, field, static_cast<int32_t>(std::stol(text)));
                return true;
            case google::protobuf::FieldDescriptor::CPPTYPE_INT64:
                reflection->SetInt64(&message, field, static_cast<int64_t>(std::stoll(text)));
                return true;
            case google::protobuf::FieldDescriptor::CPPTYPE_UINT32:
                reflection->SetUInt32(&message, field, static_cast<uint32_t>(std::stoul(text)));
                return true;
            case google::protobuf::FieldDescriptor::CPPTYPE_UINT64:
                reflection->SetUInt64(&message, field, static_cast<uint64_t>(std::stoull(text)));
                return true;
            case google::protobuf::FieldDescriptor::CPPTYPE_FLOAT:
                reflection->SetFloat(&message, field, std::stof(text));
                return true;
            case google::protobuf::FieldDescriptor::CPPTYPE_DOUBLE:
                reflection->SetDouble(&message, field, std::stod(text));
                return true;
            case google::protobuf::FieldDescriptor::CPPTYPE_BOOL:
                if (text == "true" || text == "1") {
                    reflection->SetBool(&message, field, true);
                    return true;
                }
                if (text == "false" || text == "0") {
                    reflection->SetBool(&message, field, false);
                    return true;
                }
                return false;
            case google::protobuf::FieldDescriptor::CPPTYPE_ENUM: {
                const google::protobuf::EnumValueDescriptor *value =
                    field->enum_type()->FindValueByName(text);
                if (value == nullptr) {
                    return false;
                }
                reflection->SetEnum(&message, field, value);
                return true;
            }
            case google::protobuf::FieldDescriptor::CPPTYPE_STRING:
                reflection->SetString(&message, field, text);
                return true;
            default:
                return false;
        }
    } catch (const std::exception &) {
        return false;
    }
}

}  // namespace

extern "C" void *protoforge_construct() {
    const google::protobuf::Descriptor *descriptor =
        google::protobuf::DescriptorPool::generated_pool()->FindMessageTypeByName(
            "__MESSAGE_FULL_NAME__");
    if (descriptor == nullptr) {
        return nullptr;
    }
    const google::protobuf::Message *prototype =
        google::protobuf::MessageFactory::generated_factory()->GetPrototype(descriptor);
    if (prototype == nullptr) {
        return nullptr;
    }
    g_instance.reset(prototype->New());
    return g_instance.get();
}

extern "C" bool protoforge_set_field(void *instance, const char *name, const char *value) {
    if (instance == nullptr || instance != g_instance.get() || name == nullptr ||
        value == nullptr) {
        return false;
    }
    google::protobuf::Message *message = g_instance.get();
    const google::protobuf::FieldDescriptor *field =
        message->GetDescriptor()->FindFieldByName(name);
    if (field == nullptr || field->is_repeated()) {
        return false;
    }
    return assign_field(*message, field, value);
}

extern "C" bool protoforge_serialize(void *instance, const uint8_t **out_data,
                                     size_t *out_len) {
    if (instance == nullptr || instance != g_instance.get() || out_data == nullptr ||
        out_len == nullptr) {
        return false;
    }
    g_wire.clear();
    if (!g_instance->SerializeToString(&g_wire)) {
        return false;
    }
    *out_data = reinterpret_cast<const uint8_t *>(g_wire.data());
    *out_len = g_wire.size();
    return true;
}
"#;

/// Render the shim source for one message type.
pub fn shim_source(message_full_name: &str) -> String {
    SHIM_TEMPLATE.replace(MESSAGE_NAME_SLOT, message_full_name)
}
